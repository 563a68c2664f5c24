//! Core feature engine for campus maps.
//!
//! Raw topology (nodes, ways and relations) is assembled into polygons,
//! measured and simplified in a local planar projection, assigned a zone and
//! a category, and finally deduplicated and linked into parent/child pairs.
//! Everything here is pure and synchronous: input decoding and output
//! writing live in `campusmap-data`.
//!
//! The entry point is [`build_features`].

#![forbid(unsafe_code)]

pub mod assembly;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod element;
pub mod feature;
pub mod geometry;
pub mod pipeline;
pub mod resolve;
pub mod zone;

#[cfg(test)]
mod test_support;

pub use assembly::{TopologyAssembly, assemble_topology, subsumes_outer_ways};
pub use classify::{
    Category, CategoryOverrides, CategoryRule, ClassifyInput, Condition, ParseCategoryError,
    classify, determine_category, is_important_off_campus,
};
pub use config::{BuildConfig, ConfigError, NameBlacklist, OverlapConfig};
pub use diagnostics::Diagnostic;
pub use element::{
    ElementKind, ElementRef, Member, MemberRole, Node, ParseElementRefError, RawElement, Relation,
    Tags, Way,
};
pub use feature::{
    Exclusion, ExclusionReason, Feature, NameOrigin, OverlapRole, build_feature, display_name,
    parking_structure_name, resolve_name, slugify, stable_id,
};
pub use geometry::{LocalProjection, area_m2, simplify};
pub use pipeline::{BuildReport, build_features};
pub use resolve::resolve_features;
pub use zone::{Zone, ZonePolygon, ZoneResolver};
