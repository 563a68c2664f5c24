//! Semantic categories a feature can resolve to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The semantic category of a feature. Exactly one applies to every feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Hospitals and medical centres.
    #[serde(rename = "Hospital")]
    Hospital,
    /// Clinics and other healthcare facilities.
    #[serde(rename = "Clinic/Health")]
    ClinicHealth,
    /// Schools and kindergartens.
    #[serde(rename = "Lower Education")]
    LowerEducation,
    /// Libraries.
    #[serde(rename = "Library")]
    Library,
    /// Museums and galleries.
    #[serde(rename = "Museum")]
    Museum,
    /// Theatres and concert venues.
    #[serde(rename = "Performing Arts")]
    PerformingArts,
    /// Residential buildings in the off-campus village.
    #[serde(rename = "Off-Campus Housing")]
    OffCampusHousing,
    /// Residence halls, apartments and Greek houses.
    #[serde(rename = "On-Campus Housing")]
    OnCampusHousing,
    /// Dining halls, cafes and shops selling food.
    #[serde(rename = "Food Service")]
    FoodService,
    /// Swimming pools and aquatic centres.
    #[serde(rename = "Pool")]
    Pool,
    /// Stadiums and pavilions.
    #[serde(rename = "Stadium")]
    Stadium,
    /// Tennis and other courts.
    #[serde(rename = "Sports Court/Pitch")]
    SportsCourtPitch,
    /// Playing fields and tracks.
    #[serde(rename = "Sports Field")]
    SportsField,
    /// Parks, gardens and vegetated land.
    #[serde(rename = "Green Space")]
    GreenSpace,
    /// Multi-storey or underground parking.
    #[serde(rename = "Parking Structure")]
    ParkingStructure,
    /// Surface parking.
    #[serde(rename = "Parking Lot")]
    ParkingLot,
    /// Utility plants, loading docks and maintenance buildings.
    #[serde(rename = "Operations")]
    Operations,
    /// Default for the academic core.
    #[serde(rename = "Academic/Research")]
    AcademicResearch,
    /// Nothing matched and the zone gives no default.
    #[serde(rename = "Unknown")]
    Unknown,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Hospital,
        Self::ClinicHealth,
        Self::LowerEducation,
        Self::Library,
        Self::Museum,
        Self::PerformingArts,
        Self::OffCampusHousing,
        Self::OnCampusHousing,
        Self::FoodService,
        Self::Pool,
        Self::Stadium,
        Self::SportsCourtPitch,
        Self::SportsField,
        Self::GreenSpace,
        Self::ParkingStructure,
        Self::ParkingLot,
        Self::Operations,
        Self::AcademicResearch,
        Self::Unknown,
    ];

    /// Display label of the category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hospital => "Hospital",
            Self::ClinicHealth => "Clinic/Health",
            Self::LowerEducation => "Lower Education",
            Self::Library => "Library",
            Self::Museum => "Museum",
            Self::PerformingArts => "Performing Arts",
            Self::OffCampusHousing => "Off-Campus Housing",
            Self::OnCampusHousing => "On-Campus Housing",
            Self::FoodService => "Food Service",
            Self::Pool => "Pool",
            Self::Stadium => "Stadium",
            Self::SportsCourtPitch => "Sports Court/Pitch",
            Self::SportsField => "Sports Field",
            Self::GreenSpace => "Green Space",
            Self::ParkingStructure => "Parking Structure",
            Self::ParkingLot => "Parking Lot",
            Self::Operations => "Operations",
            Self::AcademicResearch => "Academic/Research",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label names no category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category {label:?}")]
pub struct ParseCategoryError {
    /// Rejected label.
    pub label: String,
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Parse a display label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError {
                label: s.to_owned(),
            })
    }
}
