//! End-to-end feature construction.

use log::{debug, info};

use crate::assembly::assemble_topology;
use crate::config::BuildConfig;
use crate::diagnostics::Diagnostic;
use crate::element::RawElement;
use crate::feature::{Exclusion, Feature, build_feature};
use crate::resolve::resolve_features;

/// Everything a build produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Emitted features in input order of their first origin.
    pub features: Vec<Feature>,
    /// Structural defects found while assembling.
    pub diagnostics: Vec<Diagnostic>,
    /// Valid elements dropped by a gate.
    pub exclusions: Vec<Exclusion>,
}

/// Assemble, annotate and resolve `elements` into features.
///
/// Ways subsumed by a building or stadium relation are not emitted on their
/// own, nor are untagged ways that only serve as holes. Nothing here fails:
/// defects end up in [`BuildReport::diagnostics`] and deliberate drops in
/// [`BuildReport::exclusions`].
///
/// # Examples
/// ```
/// use campusmap_core::{BuildConfig, RawElement, build_features};
///
/// let elements: Vec<RawElement> = serde_json::from_str(r#"[
///     {"type": "node", "id": 1, "lon": -118.4420, "lat": 34.0710},
///     {"type": "node", "id": 2, "lon": -118.4415, "lat": 34.0710},
///     {"type": "node", "id": 3, "lon": -118.4415, "lat": 34.0714},
///     {"type": "node", "id": 4, "lon": -118.4420, "lat": 34.0714},
///     {"type": "way", "id": 10, "nodes": [1, 2, 3, 4, 1],
///      "tags": {"building": "university", "name": "Powell Library"}}
/// ]"#).unwrap();
///
/// let report = build_features(&elements, &BuildConfig::default());
/// assert_eq!(report.features.len(), 1);
/// assert_eq!(report.features[0].category.label(), "Library");
/// assert!(report.diagnostics.is_empty());
/// ```
#[must_use]
pub fn build_features(elements: &[RawElement], config: &BuildConfig) -> BuildReport {
    let assembly = assemble_topology(elements);
    let mut candidates = Vec::new();
    let mut exclusions = Vec::new();
    for element in elements {
        let origin = element.element_ref();
        match element {
            RawElement::Node(_) => continue,
            RawElement::Way(way) => {
                if assembly.subsumed_ways().contains(&way.id) {
                    debug!("{origin} is represented by its relation");
                    continue;
                }
                if way.tags.is_empty() && assembly.hole_ways().contains(&way.id) {
                    debug!("{origin} only describes a hole");
                    continue;
                }
            }
            RawElement::Relation(_) => {}
        }
        let Some(geometry) = assembly.geometry(origin) else {
            continue;
        };
        match build_feature(origin, element.tags(), &geometry, config) {
            Ok(feature) => candidates.push(feature),
            Err(reason) => {
                debug!("{origin} excluded: {reason}");
                exclusions.push(Exclusion { origin, reason });
            }
        }
    }
    info!(
        "Annotated {} candidate features ({} excluded)",
        candidates.len(),
        exclusions.len()
    );

    let features = resolve_features(candidates, &config.overlap, &config.projection);
    BuildReport {
        features,
        diagnostics: assembly.into_diagnostics(),
        exclusions,
    }
}
