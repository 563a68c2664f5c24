//! Parent/child linking between overlapping features.
//!
//! Candidate parents are prefiltered with an R-tree over the planar envelopes
//! of their outer shells; the overlap ratio is then computed exactly.
#![expect(
    clippy::float_arithmetic,
    reason = "overlap ratios and distances are floating-point"
)]

use std::cmp::Ordering;

use geo::{Area, BooleanOps, BoundingRect, Buffer, Centroid, Coord, Intersects, MultiPolygon};
use log::debug;
use rstar::{AABB, RTree, RTreeObject};

use crate::config::OverlapConfig;
use crate::feature::{Feature, OverlapRole};
use crate::geometry::{LocalProjection, outer_shell};

/// Planar view of one feature.
struct Footprint<'a> {
    slot: usize,
    id: &'a str,
    area_m2: f64,
    named: bool,
    planar: MultiPolygon<f64>,
    planar_area: f64,
    shell: MultiPolygon<f64>,
    centre: Coord<f64>,
}

impl<'a> Footprint<'a> {
    fn new(slot: usize, feature: &'a Feature, projection: &LocalProjection) -> Self {
        let planar = projection.project_geometry(&feature.geometry);
        let shell = outer_shell(&planar);
        let centre = planar
            .centroid()
            .map_or_else(|| projection.project(feature.centroid_coord()), |point| point.0);
        Self {
            slot,
            id: &feature.id,
            area_m2: feature.area_m2,
            named: !feature.has_placeholder_name(),
            planar_area: planar.unsigned_area(),
            planar,
            shell,
            centre,
        }
    }

    fn distance_to(&self, other: &Self) -> f64 {
        (self.centre.x - other.centre.x).hypot(self.centre.y - other.centre.y)
    }
}

/// R-tree entry for a potential parent.
#[derive(Debug, Clone, Copy)]
struct IndexedShell {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedShell {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn envelope_of(geometry: &MultiPolygon<f64>, margin: f64) -> Option<AABB<[f64; 2]>> {
    let rect = geometry.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());
    Some(AABB::from_corners(
        [min.x - margin, min.y - margin],
        [max.x + margin, max.y + margin],
    ))
}

/// Share of `child` lying inside the outer shell of `parent`.
///
/// When the two do not touch, `child` is grown by `buffer_m` and measured
/// again against its unbuffered area.
fn overlap_ratio(child: &Footprint<'_>, parent: &Footprint<'_>, buffer_m: f64) -> f64 {
    let covered = if child.planar.intersects(&parent.shell) {
        child.planar.intersection(&parent.shell).unsigned_area()
    } else if buffer_m > 0.0 {
        let grown = child.planar.buffer(buffer_m);
        if grown.intersects(&parent.shell) {
            grown.intersection(&parent.shell).unsigned_area()
        } else {
            0.0
        }
    } else {
        0.0
    };
    (covered / child.planar_area).min(1.0)
}

/// Larger area first, then nearer centroid, then lower identifier.
fn rank(child: &Footprint<'_>, a: &Footprint<'_>, b: &Footprint<'_>) -> Ordering {
    b.area_m2
        .total_cmp(&a.area_m2)
        .then_with(|| child.distance_to(a).total_cmp(&child.distance_to(b)))
        .then_with(|| a.id.cmp(b.id))
}

/// Link every feature to the best containing feature, if any.
///
/// Children are visited in descending area order. A candidate parent must
/// carry a real name, be strictly larger than the child, and cover at least
/// `overlap.threshold` of the child's area with its outer shell. Returns the
/// number of links made.
pub fn link_parents(
    features: &mut [Feature],
    overlap: &OverlapConfig,
    projection: &LocalProjection,
) -> usize {
    let links = find_links(features, overlap, projection);
    for &(child, parent) in &links {
        let parent_id = features.get_mut(parent).map(|feature| {
            feature.overlap_role = OverlapRole::Parent;
            feature.id.clone()
        });
        if let Some(feature) = features.get_mut(child) {
            feature.parent_id = parent_id;
        }
    }
    links.len()
}

fn find_links(
    features: &[Feature],
    overlap: &OverlapConfig,
    projection: &LocalProjection,
) -> Vec<(usize, usize)> {
    let footprints: Vec<Footprint<'_>> = features
        .iter()
        .enumerate()
        .map(|(slot, feature)| Footprint::new(slot, feature, projection))
        .collect();
    let index = RTree::bulk_load(
        footprints
            .iter()
            .filter(|footprint| footprint.named)
            .filter_map(|footprint| {
                envelope_of(&footprint.shell, 0.0).map(|envelope| IndexedShell {
                    slot: footprint.slot,
                    envelope,
                })
            })
            .collect(),
    );

    let mut children: Vec<&Footprint<'_>> = footprints
        .iter()
        .filter(|footprint| {
            footprint.area_m2 >= overlap.min_child_area_m2 && footprint.planar_area > 0.0
        })
        .collect();
    children.sort_by(|a, b| b.area_m2.total_cmp(&a.area_m2).then_with(|| a.id.cmp(b.id)));

    let mut links = Vec::new();
    for child in children {
        let Some(query) = envelope_of(&child.planar, overlap.buffer_m) else {
            continue;
        };
        let parent = index
            .locate_in_envelope_intersecting(&query)
            .filter_map(|entry| footprints.get(entry.slot))
            .filter(|candidate| candidate.slot != child.slot && candidate.area_m2 > child.area_m2)
            .filter(|candidate| overlap_ratio(child, candidate, overlap.buffer_m) >= overlap.threshold)
            .min_by(|a, b| rank(child, a, b));
        if let Some(found) = parent {
            debug!("{} nests inside {}", child.id, found.id);
            links.push((child.slot, found.slot));
        }
    }
    links
}
