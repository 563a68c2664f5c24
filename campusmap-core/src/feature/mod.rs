//! Feature records and the per-element construction gates.
//!
//! A [`Feature`] is built once from an assembled geometry and the tags of the
//! element that produced it. Construction either yields an annotated feature
//! or an [`ExclusionReason`] explaining which gate dropped it.

mod identity;
mod naming;

use std::fmt;

use geo::orient::Direction;
use geo::{Centroid, Coord, MultiPolygon, Orient};
use serde::Serialize;

use crate::classify::{Category, ClassifyInput, classify, is_important_off_campus};
use crate::config::BuildConfig;
use crate::element::{ElementRef, Tags};
use crate::geometry::{area_m2, simplify};
use crate::zone::Zone;

pub use identity::{
    AREA_PRECISION, CENTROID_PRECISION, round_centroid, round_to, slugify, stable_id,
};
pub use naming::{
    NameOrigin, PLACEHOLDER_NAME, ResolvedName, collect_aliases, display_name, is_parking,
    parking_structure_name, resolve_name,
};

/// Whether other features nest inside this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapRole {
    /// Nothing nests inside.
    #[default]
    Solo,
    /// At least one other feature names this one as its parent.
    Parent,
}

/// One output feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Content-addressed identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Provenance of the display name.
    #[serde(skip)]
    pub name_origin: NameOrigin,
    /// Alternative names, never including `name`.
    pub aliases: Vec<String>,
    /// Zone containing the centroid.
    pub zone: Zone,
    /// Semantic category.
    pub category: Category,
    /// Whether the feature is a notable landmark outside campus proper.
    pub important_off_campus: bool,
    /// `[lon, lat]` rounded to six decimal places.
    pub centroid: [f64; 2],
    /// Elements that produced the feature.
    #[serde(rename = "osm_ids")]
    pub origins: Vec<ElementRef>,
    /// Planar area in square metres, rounded to two decimal places.
    pub area_m2: f64,
    /// Whether other features nest inside this one.
    pub overlap_role: OverlapRole,
    /// Identifier of the containing feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Simplified geometry in geographic coordinates.
    #[serde(skip)]
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    /// Whether the display name is the placeholder.
    #[must_use]
    pub fn has_placeholder_name(&self) -> bool {
        self.name_origin == NameOrigin::Placeholder
    }

    /// Centroid as a coordinate.
    #[must_use]
    pub const fn centroid_coord(&self) -> Coord<f64> {
        let [x, y] = self.centroid;
        Coord { x, y }
    }
}

/// Why a valid element was not turned into a feature.
#[derive(Debug, Clone, PartialEq)]
pub enum ExclusionReason {
    /// Placeholder-named and smaller than the unnamed minimum.
    BelowUnnamedArea {
        /// Planar area in square metres.
        area_m2: f64,
    },
    /// Minor building subtype smaller than the excluded-subtype minimum.
    ExcludedSubtype {
        /// Lowercase `building` value.
        subtype: String,
        /// Planar area in square metres.
        area_m2: f64,
    },
    /// Name matched the blacklist.
    Blacklisted {
        /// Matching name.
        name: String,
    },
    /// The geometry has no centroid.
    NoCentroid,
    /// Nothing renderable survived simplification.
    EmptyAfterSimplification,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowUnnamedArea { area_m2 } => {
                write!(f, "unnamed and only {area_m2:.1} m²")
            }
            Self::ExcludedSubtype { subtype, area_m2 } => {
                write!(f, "building={subtype} and only {area_m2:.1} m²")
            }
            Self::Blacklisted { name } => write!(f, "name {name:?} is blacklisted"),
            Self::NoCentroid => f.write_str("geometry has no centroid"),
            Self::EmptyAfterSimplification => f.write_str("empty after simplification"),
        }
    }
}

/// A deliberately excluded element.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    /// Element that was dropped.
    pub origin: ElementRef,
    /// Gate that dropped it.
    pub reason: ExclusionReason,
}

/// The area and name gates, applied before any annotation work.
///
/// # Errors
/// Returns the reason of the first gate that drops the element.
pub fn check_gates(
    resolved: &ResolvedName,
    tags: &Tags,
    area: f64,
    config: &BuildConfig,
) -> Result<(), ExclusionReason> {
    if resolved.is_placeholder() && area < config.min_area_unnamed_m2 {
        return Err(ExclusionReason::BelowUnnamedArea { area_m2: area });
    }
    if let Some(subtype) = tags.get("building").map(|value| value.to_lowercase())
        && config.excluded_building_types.contains(&subtype)
        && area < config.min_area_excluded_m2
    {
        return Err(ExclusionReason::ExcludedSubtype {
            subtype,
            area_m2: area,
        });
    }
    if config.name_blacklist.is_blocked(&resolved.name) {
        return Err(ExclusionReason::Blacklisted {
            name: resolved.name.clone(),
        });
    }
    Ok(())
}

/// Build a feature for `origin` from its assembled `geometry` and `tags`.
///
/// Gates run in order: unnamed area, excluded subtype, blacklist, centroid,
/// then simplification. The area gates use the unsimplified geometry.
///
/// # Errors
/// Returns the [`ExclusionReason`] of the first gate that drops the element.
pub fn build_feature(
    origin: ElementRef,
    tags: &Tags,
    geometry: &MultiPolygon<f64>,
    config: &BuildConfig,
) -> Result<Feature, ExclusionReason> {
    let oriented = geometry.orient(Direction::Default);
    let area = area_m2(&oriented, &config.projection);
    let resolved = resolve_name(tags);
    check_gates(&resolved, tags, area, config)?;

    let ResolvedName {
        name,
        origin: name_origin,
        ..
    } = display_name(resolved, tags);
    let aliases = collect_aliases(tags, &name);

    let centroid = oriented
        .centroid()
        .map(|point| round_centroid(point.0))
        .ok_or(ExclusionReason::NoCentroid)?;
    let [lon, lat] = centroid;
    let zone = config.zones.determine_zone(Coord { x: lon, y: lat });
    let category = classify(
        &ClassifyInput {
            tags,
            name: &name,
            zone: Some(zone),
            origin: Some(origin),
        },
        &config.overrides,
    );

    let simplified = simplify(&oriented, config.simplify_tolerance_m, &config.projection)
        .ok_or(ExclusionReason::EmptyAfterSimplification)?;

    Ok(Feature {
        id: stable_id(&name, centroid),
        important_off_campus: is_important_off_campus(&name),
        name,
        name_origin,
        aliases,
        zone,
        category,
        centroid,
        origins: vec![origin],
        area_m2: round_to(area, AREA_PRECISION),
        overlap_role: OverlapRole::Solo,
        parent_id: None,
        geometry: simplified,
    })
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "fixtures are laid out in metres"
)]
mod tests {
    use super::*;
    use crate::test_support::rectangle;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> BuildConfig {
        BuildConfig::default()
    }

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    fn annotates_a_named_building(config: BuildConfig) {
        let feature = build_feature(
            ElementRef::way(1),
            &tags(&[("building", "yes"), ("name", "Powell Library"), ("alt_name", "Powell")]),
            &rectangle(200.0, 150.0, 40.0, 30.0),
            &config,
        )
        .expect("feature is kept");
        assert_eq!(feature.name, "Powell Library");
        assert_eq!(feature.aliases, vec!["Powell"]);
        assert_eq!(feature.category, Category::Library);
        assert_eq!(feature.zone, Zone::NorthCampus);
        assert!((feature.area_m2 - 1200.0).abs() < 0.01);
        assert!(feature.id.starts_with("powell-library-"));
        assert_eq!(feature.overlap_role, OverlapRole::Solo);
    }

    #[rstest]
    #[case(80.0, true)]
    #[case(79.0, false)]
    fn unnamed_area_threshold_is_inclusive(
        config: BuildConfig,
        #[case] area_m2: f64,
        #[case] kept: bool,
    ) {
        let unnamed = resolve_name(&Tags::new());
        let result = check_gates(&unnamed, &tags(&[("building", "yes")]), area_m2, &config);
        assert_eq!(result.is_ok(), kept);
    }

    #[rstest]
    fn tiny_unnamed_footprints_are_excluded(config: BuildConfig) {
        let result = build_feature(
            ElementRef::way(1),
            &tags(&[("building", "yes")]),
            &rectangle(0.0, 0.0, 5.0, 5.0),
            &config,
        );
        assert!(matches!(result, Err(ExclusionReason::BelowUnnamedArea { .. })));
    }

    #[rstest]
    fn small_sheds_are_excluded(config: BuildConfig) {
        let result = build_feature(
            ElementRef::way(1),
            &tags(&[("building", "Shed"), ("name", "Tool Shed")]),
            &rectangle(0.0, 0.0, 10.0, 10.0),
            &config,
        );
        assert!(matches!(
            result,
            Err(ExclusionReason::ExcludedSubtype { ref subtype, .. }) if subtype == "shed"
        ));
    }

    #[rstest]
    fn blacklisted_names_are_excluded(config: BuildConfig) {
        let result = build_feature(
            ElementRef::way(1),
            &tags(&[("building", "apartments"), ("name", "Axiom Apartments")]),
            &rectangle(0.0, 0.0, 30.0, 30.0),
            &config,
        );
        assert!(matches!(result, Err(ExclusionReason::Blacklisted { .. })));
    }

    #[rstest]
    fn unnamed_parking_is_numbered(config: BuildConfig) {
        let feature = build_feature(
            ElementRef::relation(5),
            &tags(&[("amenity", "parking"), ("parking", "multi-storey"), ("ref", "PS 7")]),
            &rectangle(-50.0, -300.0, 60.0, 60.0),
            &config,
        )
        .expect("parking is kept");
        assert_eq!(feature.name, "Parking Structure 7");
        assert_eq!(feature.name_origin, NameOrigin::Derived);
        assert_eq!(feature.category, Category::ParkingStructure);
        assert_eq!(feature.aliases, vec!["PS 7"]);
    }

    #[rstest]
    #[case(&[("amenity", "parking")], "Parking Structure", NameOrigin::Derived, Category::ParkingStructure)]
    #[case(&[("amenity", "parking"), ("name", "Lot 36"), ("ref", "36")], "Lot 36", NameOrigin::Tagged, Category::ParkingLot)]
    #[case(&[("building", "parking"), ("name", "Structure 4")], "Structure 4", NameOrigin::Tagged, Category::ParkingStructure)]
    fn parking_names_follow_their_tags(
        config: BuildConfig,
        #[case] pairs: &[(&str, &str)],
        #[case] name: &str,
        #[case] origin: NameOrigin,
        #[case] category: Category,
    ) {
        let feature = build_feature(
            ElementRef::way(9),
            &tags(pairs),
            &rectangle(-50.0, -300.0, 40.0, 40.0),
            &config,
        )
        .expect("parking is kept");
        assert_eq!(feature.name, name);
        assert_eq!(feature.name_origin, origin);
        assert_eq!(feature.category, category);
    }

    #[rstest]
    fn clockwise_input_measures_the_same(config: BuildConfig) {
        let counter_clockwise = rectangle(0.0, 0.0, 20.0, 20.0);
        let clockwise = counter_clockwise.orient(Direction::Reversed);
        let building = tags(&[("building", "yes"), ("name", "Kinsey")]);
        let a = build_feature(ElementRef::way(1), &building, &counter_clockwise, &config)
            .expect("kept");
        let b = build_feature(ElementRef::way(1), &building, &clockwise, &config).expect("kept");
        assert_eq!(a.area_m2, b.area_m2);
        assert_eq!(a.id, b.id);
    }
}
