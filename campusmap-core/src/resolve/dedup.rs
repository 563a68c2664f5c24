//! Collapse features that land on the same rounded centroid.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::debug;

use crate::feature::Feature;

type CentroidKey = (u64, u64);

fn centroid_key(feature: &Feature) -> CentroidKey {
    let [lon, lat] = feature.centroid;
    (lon.to_bits(), lat.to_bits())
}

/// Keep one feature per rounded centroid.
///
/// A feature with a stronger name origin replaces the one kept so far; on a
/// tie the first encountered stays. The survivor inherits the origins of the
/// features it absorbed and keeps the slot of the first arrival.
#[must_use]
pub fn deduplicate(features: Vec<Feature>) -> Vec<Feature> {
    let mut kept: Vec<Feature> = Vec::with_capacity(features.len());
    let mut slots: HashMap<CentroidKey, usize> = HashMap::new();
    for candidate in features {
        match slots.entry(centroid_key(&candidate)) {
            Entry::Vacant(vacant) => {
                vacant.insert(kept.len());
                kept.push(candidate);
            }
            Entry::Occupied(occupied) => {
                let Some(incumbent) = kept.get_mut(*occupied.get()) else {
                    continue;
                };
                absorb(incumbent, candidate);
            }
        }
    }
    kept
}

fn absorb(incumbent: &mut Feature, mut candidate: Feature) {
    if candidate.name_origin > incumbent.name_origin {
        debug!(
            "{} replaces {} at {:?}",
            candidate.name, incumbent.name, incumbent.centroid
        );
        candidate.origins.append(&mut incumbent.origins);
        *incumbent = candidate;
    } else {
        debug!(
            "{} absorbs {} at {:?}",
            incumbent.name, candidate.name, incumbent.centroid
        );
        incumbent.origins.append(&mut candidate.origins);
    }
}
