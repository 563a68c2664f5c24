//! Facade crate for the campus map feature engine.
//!
//! This crate re-exports the core domain types and exposes the payload and
//! GeoJSON boundaries behind the `data` feature flag.

#![forbid(unsafe_code)]

pub use campusmap_core::{
    BuildConfig, BuildReport, Category, CategoryOverrides, ConfigError, Diagnostic, ElementRef,
    Exclusion, ExclusionReason, Feature, LocalProjection, OverlapConfig, OverlapRole, RawElement,
    TopologyAssembly, Zone, ZoneResolver, assemble_topology, build_features, resolve_features,
};

#[cfg(feature = "data")]
pub use campusmap_data::{
    GeoJsonWriteError, OverpassError, OverpassPayload, WrittenArtefacts, merge_payloads,
    write_feature_collection,
};
