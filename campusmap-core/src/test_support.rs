//! Fixtures shared by unit tests.
#![expect(
    clippy::float_arithmetic,
    reason = "fixtures are laid out in metres"
)]

use geo::{Centroid, Coord, LineString, MultiPolygon, Polygon};

use crate::classify::Category;
use crate::element::ElementRef;
use crate::feature::{Feature, NameOrigin, OverlapRole, stable_id};
use crate::geometry::{LocalProjection, area_m2};
use crate::zone::Zone;

/// Axis-aligned rectangle of `width_m` by `height_m` whose south-west corner
/// sits `east_m` and `north_m` from the default projection origin.
pub fn rectangle(east_m: f64, north_m: f64, width_m: f64, height_m: f64) -> MultiPolygon<f64> {
    let projection = LocalProjection::default();
    let corner = |x: f64, y: f64| projection.unproject(Coord { x, y });
    MultiPolygon::new(vec![Polygon::new(
        LineString::from(vec![
            corner(east_m, north_m),
            corner(east_m + width_m, north_m),
            corner(east_m + width_m, north_m + height_m),
            corner(east_m, north_m + height_m),
            corner(east_m, north_m),
        ]),
        Vec::new(),
    )])
}

/// A bare feature at `centroid` produced by `way/{way}`.
pub fn feature_at(name: &str, origin: NameOrigin, centroid: [f64; 2], way: i64) -> Feature {
    Feature {
        id: stable_id(name, centroid),
        name: name.to_owned(),
        name_origin: origin,
        aliases: Vec::new(),
        zone: Zone::NorthCampus,
        category: Category::AcademicResearch,
        important_off_campus: false,
        centroid,
        origins: vec![ElementRef::way(way)],
        area_m2: 0.0,
        overlap_role: OverlapRole::Solo,
        parent_id: None,
        geometry: MultiPolygon::new(Vec::new()),
    }
}

/// A named feature covering `geometry`, with its area and centroid filled in.
pub fn footprint(name: &str, geometry: MultiPolygon<f64>, way: i64) -> Feature {
    let projection = LocalProjection::default();
    let centroid = geometry
        .centroid()
        .map_or([0.0, 0.0], |point| [point.x(), point.y()]);
    let mut feature = feature_at(name, NameOrigin::Tagged, centroid, way);
    feature.area_m2 = area_m2(&geometry, &projection);
    feature.geometry = geometry;
    feature
}
