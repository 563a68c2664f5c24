//! Coarse geographic zones and centroid-to-zone resolution.

use std::fmt;

use geo::{Coord, Intersects, Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Named campus district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Academic core north of the main east-west axis.
    #[serde(rename = "North Campus")]
    NorthCampus,
    /// Academic, medical and athletic core south of the axis.
    #[serde(rename = "South Campus")]
    SouthCampus,
    /// Residential district on the western slope.
    #[serde(rename = "The Hill")]
    TheHill,
    /// Off-campus village to the south.
    #[serde(rename = "Westwood")]
    Westwood,
}

impl Zone {
    /// Every zone in resolution order.
    pub const ALL: [Self; 4] = [
        Self::TheHill,
        Self::NorthCampus,
        Self::SouthCampus,
        Self::Westwood,
    ];

    /// Human-readable zone name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NorthCampus => "North Campus",
            Self::SouthCampus => "South Campus",
            Self::TheHill => "The Hill",
            Self::Westwood => "Westwood",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(zone, west, south, east, north)` in degrees, in resolution order.
const CAMPUS_BOUNDARIES: [(Zone, f64, f64, f64, f64); 4] = [
    (Zone::TheHill, -118.456, 34.064, -118.447, 34.078),
    (Zone::NorthCampus, -118.447, 34.070, -118.438, 34.078),
    (Zone::SouthCampus, -118.447, 34.062, -118.438, 34.070),
    (Zone::Westwood, -118.450, 34.056, -118.438, 34.062),
];

const HILL_MAX_LON: f64 = -118.445;
const WESTWOOD_MIN_LON: f64 = -118.44;
const NORTH_MIN_LAT: f64 = 34.07;

/// A named, fixed boundary polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePolygon {
    /// Zone the boundary belongs to.
    pub zone: Zone,
    /// Boundary in geographic coordinates.
    pub boundary: Polygon<f64>,
}

/// Ordered zone table with a total fallback.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use campusmap_core::{Zone, ZoneResolver};
///
/// let zones = ZoneResolver::campus();
/// assert_eq!(zones.determine_zone(Coord { x: -118.4425, y: 34.0745 }), Zone::NorthCampus);
/// // Far outside every boundary, the threshold split still answers.
/// assert_eq!(zones.determine_zone(Coord { x: -118.30, y: 34.00 }), Zone::Westwood);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneResolver {
    zones: Vec<ZonePolygon>,
}

impl ZoneResolver {
    /// Resolver over caller-supplied zone polygons, tested in the given order.
    #[must_use]
    pub const fn new(zones: Vec<ZonePolygon>) -> Self {
        Self { zones }
    }

    /// The built-in campus zone table.
    #[must_use]
    pub fn campus() -> Self {
        let zones = CAMPUS_BOUNDARIES
            .iter()
            .map(|&(zone, west, south, east, north)| ZonePolygon {
                zone,
                boundary: Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north })
                    .to_polygon(),
            })
            .collect();
        Self::new(zones)
    }

    /// Zone polygons in resolution order.
    #[must_use]
    pub fn zones(&self) -> &[ZonePolygon] {
        &self.zones
    }

    /// First zone whose boundary contains or touches `centroid`, otherwise
    /// the threshold fallback. Never fails.
    #[must_use]
    pub fn determine_zone(&self, centroid: Coord<f64>) -> Zone {
        let point = Point::from(centroid);
        self.zones
            .iter()
            .find(|candidate| candidate.boundary.intersects(&point))
            .map_or_else(|| fallback_zone(centroid), |candidate| candidate.zone)
    }
}

impl Default for ZoneResolver {
    fn default() -> Self {
        Self::campus()
    }
}

/// Longitude/latitude split used when no boundary contains the point.
#[must_use]
pub fn fallback_zone(centroid: Coord<f64>) -> Zone {
    if centroid.x <= HILL_MAX_LON {
        Zone::TheHill
    } else if centroid.x >= WESTWOOD_MIN_LON {
        Zone::Westwood
    } else if centroid.y >= NORTH_MIN_LAT {
        Zone::NorthCampus
    } else {
        Zone::SouthCampus
    }
}
