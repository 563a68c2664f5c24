//! Simple-ring validation.

use std::collections::BTreeSet;

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, Coord, LineString, Polygon};

/// Number of distinct coordinates in the sequence.
pub(crate) fn distinct_count(coords: &[Coord<f64>]) -> usize {
    coords
        .iter()
        .map(|coord| (coord.x.to_bits(), coord.y.to_bits()))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Close an open coordinate sequence by repeating its first coordinate.
pub(crate) fn close(mut coords: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
        if first != last {
            coords.push(first);
        }
    }
    coords
}

/// Whether the ring is the boundary of exactly one simple polygon.
///
/// The ring must be closed, carry at least three distinct coordinates,
/// enclose a non-zero area, and no two non-adjacent edges may touch.
/// Adjacent edges may only share their common endpoint.
///
/// # Examples
/// ```
/// use geo::line_string;
/// use campusmap_core::geometry::is_simple_ring;
///
/// let square = line_string![(x: 0., y: 0.), (x: 1., y: 0.), (x: 1., y: 1.), (x: 0., y: 1.), (x: 0., y: 0.)];
/// let bowtie = line_string![(x: 0., y: 0.), (x: 1., y: 1.), (x: 1., y: 0.), (x: 0., y: 1.), (x: 0., y: 0.)];
/// assert!(is_simple_ring(&square));
/// assert!(!is_simple_ring(&bowtie));
/// ```
#[must_use]
pub fn is_simple_ring(ring: &LineString<f64>) -> bool {
    let mut coords = ring.0.clone();
    coords.dedup();
    if coords.len() < 4 || coords.first() != coords.last() || distinct_count(&coords) < 3 {
        return false;
    }
    let cleaned = LineString::new(coords);
    if Polygon::new(cleaned.clone(), Vec::new()).unsigned_area() <= 0.0 {
        return false;
    }

    let edges: Vec<_> = cleaned.lines().collect();
    let edge_count = edges.len();
    for (i, first) in edges.iter().enumerate() {
        for (j, second) in edges.iter().enumerate().skip(i + 1) {
            let adjacent = j == i + 1 || (i == 0 && j + 1 == edge_count);
            match line_intersection(*first, *second) {
                None => {}
                Some(LineIntersection::SinglePoint {
                    is_proper: false, ..
                }) if adjacent => {}
                Some(_) => return false,
            }
        }
    }
    true
}
