//! Global passes over the annotated feature set.
//!
//! Deduplication runs first so that nesting only ever sees one feature per
//! rounded centroid.

mod dedup;
mod nesting;

use log::info;

use crate::config::OverlapConfig;
use crate::feature::Feature;
use crate::geometry::LocalProjection;

pub use dedup::deduplicate;
pub use nesting::link_parents;

/// Deduplicate `features`, then link children to their parents.
#[must_use]
pub fn resolve_features(
    features: Vec<Feature>,
    overlap: &OverlapConfig,
    projection: &LocalProjection,
) -> Vec<Feature> {
    let candidates = features.len();
    let mut resolved = deduplicate(features);
    let merged = candidates.saturating_sub(resolved.len());
    let links = link_parents(&mut resolved, overlap, projection);
    info!(
        "resolved {} features: {merged} merged as duplicates, {links} nested",
        resolved.len()
    );
    resolved
}
