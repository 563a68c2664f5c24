//! Input and output boundaries for the campus map builder.
//!
//! Responsibilities:
//! - Decode Overpass JSON payloads into typed raw elements.
//! - Merge payloads from several sub-queries, keeping one copy per element.
//! - Write the final GeoJSON feature collection and attribution notice.
//!
//! Boundaries:
//! - Do not encode domain rules (they live in `campusmap-core`).
//! - No network access; payloads arrive as files.

mod geojson;
mod merge;
mod overpass;

pub use geojson::{
    ATTRIBUTION, ATTRIBUTION_FILE, FeatureCollection, GEOJSON_FILE, GeoJsonFeature,
    GeoJsonWriteError, Geometry, WrittenArtefacts, write_feature_collection,
};
pub use merge::merge_payloads;
pub use overpass::{OverpassError, OverpassPayload};
