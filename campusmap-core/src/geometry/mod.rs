//! Planar measurement and shape simplification.
//!
//! Geometry is stored in geographic coordinates. Area and simplification
//! operate on a [`LocalProjection`] so that tolerances are expressed in metres.
//! The simplified shape produced here is the only shape a feature carries: it
//! is rendered and hit-tested alike.
#![expect(
    clippy::float_arithmetic,
    reason = "area thresholds and tolerances are floating-point"
)]

mod projection;
mod ring;

use geo::{Area, Contains, Intersects, LineString, MultiPolygon, Polygon, Simplify, unary_union};

pub use projection::{CAMPUS_ORIGIN, LocalProjection};
pub use ring::is_simple_ring;
pub(crate) use ring::{close, distinct_count};

/// Polygons with a geographic area at or below this value (degrees²) are
/// treated as empty. One square metre is roughly `8e-11` at mid latitudes.
const EMPTY_AREA_DEG2: f64 = 1e-16;

/// Planar area of `geometry` in square metres.
///
/// The projection is linear, so the result is invariant to ring start and
/// monotonic under containment.
///
/// # Examples
/// ```
/// use geo::{MultiPolygon, polygon};
/// use campusmap_core::{LocalProjection, geometry::area_m2};
///
/// let projection = LocalProjection::default();
/// let square = MultiPolygon::new(vec![polygon![
///     (x: -118.4445, y: 34.07),
///     (x: -118.4444, y: 34.07),
///     (x: -118.4444, y: 34.0701),
///     (x: -118.4445, y: 34.0701),
/// ]]);
/// let area = area_m2(&square, &projection);
/// assert!((area - 102.4).abs() < 1.0);
/// ```
#[must_use]
pub fn area_m2(geometry: &MultiPolygon<f64>, projection: &LocalProjection) -> f64 {
    projection.project_geometry(geometry).unsigned_area()
}

/// Simplify `geometry` within `tolerance_m` metres without breaking topology.
///
/// Each ring is simplified in planar space. A ring whose simplified form is no
/// longer simple keeps its original vertices. A polygon whose simplified holes
/// escape the simplified shell or run into each other falls back to its
/// original shape, and so does the whole geometry when simplified parts come
/// to overlap. The output never self-intersects and never collapses a ring.
/// Returns `None` when nothing renderable remains.
#[must_use]
pub fn simplify(
    geometry: &MultiPolygon<f64>,
    tolerance_m: f64,
    projection: &LocalProjection,
) -> Option<MultiPolygon<f64>> {
    let planar = projection.project_geometry(geometry);
    let polygons: Vec<Polygon<f64>> = planar
        .iter()
        .filter_map(|polygon| simplify_polygon(polygon, tolerance_m))
        .collect();
    if polygons.is_empty() {
        return None;
    }
    let simplified = if pairwise_disjoint(&polygons) {
        MultiPolygon::new(polygons)
    } else {
        planar
    };
    Some(projection.unproject_geometry(&simplified))
}

fn simplify_polygon(polygon: &Polygon<f64>, tolerance_m: f64) -> Option<Polygon<f64>> {
    let exterior = simplify_ring(polygon.exterior(), tolerance_m)?;
    let interiors: Vec<LineString<f64>> = polygon
        .interiors()
        .iter()
        .filter_map(|ring| simplify_ring(ring, tolerance_m))
        .collect();
    let shell = Polygon::new(exterior.clone(), Vec::new());
    let holes: Vec<Polygon<f64>> = interiors
        .iter()
        .map(|ring| Polygon::new(ring.clone(), Vec::new()))
        .collect();
    if holes.iter().all(|hole| shell.contains(hole)) && pairwise_disjoint(&holes) {
        Some(Polygon::new(exterior, interiors))
    } else {
        Some(polygon.clone())
    }
}

fn pairwise_disjoint(polygons: &[Polygon<f64>]) -> bool {
    polygons.iter().enumerate().all(|(index, polygon)| {
        polygons
            .iter()
            .skip(index + 1)
            .all(|other| !polygon.intersects(other))
    })
}

fn simplify_ring(ring: &LineString<f64>, tolerance_m: f64) -> Option<LineString<f64>> {
    let simplified = ring.simplify(tolerance_m);
    if is_simple_ring(&simplified) {
        Some(simplified)
    } else if is_simple_ring(ring) {
        Some(ring.clone())
    } else {
        None
    }
}

/// Re-validate a multipolygon by running it through a union with itself.
///
/// This is the boolean-ops equivalent of the zero-width buffer idiom: rings
/// are re-noded, overlapping parts merged, and degenerate slivers removed.
/// Returns `None` when the cleaned geometry has no area.
#[must_use]
pub fn normalise(geometry: &MultiPolygon<f64>) -> Option<MultiPolygon<f64>> {
    let cleaned = unary_union(geometry.iter());
    let kept: Vec<Polygon<f64>> = cleaned
        .into_iter()
        .filter(|polygon| polygon.unsigned_area() > EMPTY_AREA_DEG2)
        .collect();
    (!kept.is_empty()).then(|| MultiPolygon::new(kept))
}

/// The exterior rings of `geometry` with all holes filled.
#[must_use]
pub fn outer_shell(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry
        .iter()
        .map(|polygon| Polygon::new(polygon.exterior().clone(), Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, CoordsIter, polygon};
    use rstest::{fixture, rstest};

    #[fixture]
    fn projection() -> LocalProjection {
        LocalProjection::default()
    }

    /// Square of `side_m` metres with its south-west corner `offset_m` east
    /// and north of the projection origin, in geographic coordinates.
    fn square(projection: &LocalProjection, offset_m: f64, side_m: f64) -> Polygon<f64> {
        let corner = |x: f64, y: f64| projection.unproject(Coord { x, y });
        Polygon::new(
            LineString::from(vec![
                corner(offset_m, offset_m),
                corner(offset_m + side_m, offset_m),
                corner(offset_m + side_m, offset_m + side_m),
                corner(offset_m, offset_m + side_m),
                corner(offset_m, offset_m),
            ]),
            Vec::new(),
        )
    }

    #[rstest]
    fn area_is_invariant_to_ring_rotation(projection: LocalProjection) {
        let base = square(&projection, 0.0, 30.0);
        let mut coords: Vec<Coord<f64>> = base.exterior().0.clone();
        coords.pop();
        coords.rotate_left(2);
        let rotated = Polygon::new(LineString::from(close(coords)), Vec::new());

        let a = area_m2(&MultiPolygon::new(vec![base]), &projection);
        let b = area_m2(&MultiPolygon::new(vec![rotated]), &projection);
        assert!((a - 900.0).abs() < 1e-6);
        assert!((a - b).abs() < 1e-9);
    }

    #[rstest]
    fn area_is_monotonic_under_containment(projection: LocalProjection) {
        let outer = MultiPolygon::new(vec![square(&projection, 0.0, 40.0)]);
        let inner = MultiPolygon::new(vec![square(&projection, 5.0, 10.0)]);
        assert!(area_m2(&outer, &projection) >= area_m2(&inner, &projection));
    }

    #[rstest]
    fn simplify_removes_sub_tolerance_wobble(projection: LocalProjection) {
        let corner = |x: f64, y: f64| projection.unproject(Coord { x, y });
        let wobbly = Polygon::new(
            LineString::from(vec![
                corner(0.0, 0.0),
                corner(10.0, 0.1),
                corner(20.0, 0.0),
                corner(20.0, 20.0),
                corner(0.0, 20.0),
                corner(0.0, 0.0),
            ]),
            Vec::new(),
        );
        let simplified = simplify(&MultiPolygon::new(vec![wobbly]), 0.4, &projection)
            .expect("square should survive simplification");
        assert_eq!(simplified.exterior_coords_iter().count(), 5);
    }

    #[rstest]
    fn simplify_keeps_small_rings_intact(projection: LocalProjection) {
        let tiny = MultiPolygon::new(vec![square(&projection, 0.0, 0.3)]);
        let simplified = simplify(&tiny, 0.4, &projection).expect("ring must not collapse");
        assert!(area_m2(&simplified, &projection) > 0.0);
    }

    /// Closed ring through planar `points`, in geographic coordinates.
    fn ring(projection: &LocalProjection, points: &[(f64, f64)]) -> LineString<f64> {
        let coords = points
            .iter()
            .map(|&(x, y)| projection.unproject(Coord { x, y }))
            .collect();
        LineString::from(close(coords))
    }

    /// A 20 m square at `offset_m` whose east edge dents 1 m inwards at mid
    /// height, and a sub-metre square tucked into the dent.
    fn dented_pair(
        projection: &LocalProjection,
        offset_m: f64,
    ) -> (LineString<f64>, LineString<f64>) {
        let at = |points: &[(f64, f64)]| {
            let shifted: Vec<(f64, f64)> = points
                .iter()
                .map(|&(x, y)| (x + offset_m, y + offset_m))
                .collect();
            ring(projection, &shifted)
        };
        (
            at(&[
                (0.0, 0.0),
                (20.0, 0.0),
                (20.0, 8.0),
                (19.0, 10.0),
                (20.0, 12.0),
                (20.0, 20.0),
                (0.0, 20.0),
            ]),
            at(&[(19.6, 9.6), (20.4, 9.6), (20.4, 10.4), (19.6, 10.4)]),
        )
    }

    #[rstest]
    fn parts_that_would_overlap_keep_their_original_shape(projection: LocalProjection) {
        let (dented, tucked) = dented_pair(&projection, 0.0);
        let original = MultiPolygon::new(vec![
            Polygon::new(dented, Vec::new()),
            Polygon::new(tucked, Vec::new()),
        ]);
        let simplified = simplify(&original, 1.5, &projection).expect("parts survive");
        assert_eq!(simplified.exterior_coords_iter().count(), 13);
        let parts: Vec<&Polygon<f64>> = simplified.iter().collect();
        assert!(matches!(parts.as_slice(), [a, b] if !a.intersects(*b)));
    }

    #[rstest]
    fn holes_that_would_touch_keep_the_original_polygon(projection: LocalProjection) {
        let (dented, tucked) = dented_pair(&projection, 5.0);
        let courtyard = Polygon::new(
            ring(&projection, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)]),
            vec![dented, tucked],
        );
        let simplified = simplify(&MultiPolygon::new(vec![courtyard]), 1.5, &projection)
            .expect("courtyard survives");
        let holes: Vec<usize> = simplified
            .iter()
            .flat_map(|polygon| polygon.interiors().iter().map(|hole| hole.0.len()))
            .collect();
        assert_eq!(holes, vec![8, 5]);
    }

    #[rstest]
    fn normalise_drops_degenerate_geometry() {
        let flat = MultiPolygon::new(vec![polygon![
            (x: 0., y: 0.),
            (x: 1., y: 0.),
            (x: 2., y: 0.),
        ]]);
        assert!(normalise(&flat).is_none());
    }

    #[rstest]
    fn outer_shell_fills_holes(projection: LocalProjection) {
        let outer = square(&projection, 0.0, 40.0);
        let hole = square(&projection, 10.0, 10.0);
        let holed = Polygon::new(outer.exterior().clone(), vec![hole.exterior().clone()]);
        let shell = outer_shell(&MultiPolygon::new(vec![holed]));
        assert!((area_m2(&shell, &projection) - 1600.0).abs() < 1e-6);
    }
}
