//! GeoJSON output and the attribution notice.

use camino::{Utf8Path, Utf8PathBuf};
use campusmap_core::Feature;
use geo::{LineString, MultiPolygon, Polygon};
use log::info;
use serde::Serialize;
use thiserror::Error;

/// File name of the feature collection inside the output directory.
pub const GEOJSON_FILE: &str = "campus.geojson";
/// File name of the attribution notice inside the output directory.
pub const ATTRIBUTION_FILE: &str = "attribution.txt";
/// Licence notice required by the upstream data.
pub const ATTRIBUTION: &str =
    "© OpenStreetMap contributors — Data: ODbL 1.0 (opendatacommons.org/licenses/odbl/)";

/// A GeoJSON polygonal geometry in `[lon, lat]` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single polygon: exterior ring followed by holes.
    Polygon {
        /// Rings of the polygon.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Polygons, each as a list of rings.
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

fn ring_positions(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|coord| [coord.x, coord.y]).collect()
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_positions)
        .collect()
}

impl From<&MultiPolygon<f64>> for Geometry {
    fn from(geometry: &MultiPolygon<f64>) -> Self {
        match geometry.0.as_slice() {
            [single] => Self::Polygon {
                coordinates: polygon_rings(single),
            },
            many => Self::MultiPolygon {
                coordinates: many.iter().map(polygon_rings).collect(),
            },
        }
    }
}

/// One GeoJSON feature borrowing its properties from a [`Feature`].
#[derive(Debug, Clone, Serialize)]
pub struct GeoJsonFeature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Feature properties.
    pub properties: &'a Feature,
    /// Simplified geometry.
    pub geometry: Geometry,
}

/// A GeoJSON `FeatureCollection`.
///
/// # Examples
/// ```
/// use campusmap_data::FeatureCollection;
///
/// let collection = FeatureCollection::new(&[]);
/// let json = serde_json::to_string(&collection).unwrap();
/// assert_eq!(json, r#"{"type":"FeatureCollection","features":[]}"#);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    /// Features in output order.
    pub features: Vec<GeoJsonFeature<'a>>,
}

impl<'a> FeatureCollection<'a> {
    /// Wrap `features` for serialisation.
    #[must_use]
    pub fn new(features: &'a [Feature]) -> Self {
        Self {
            kind: "FeatureCollection",
            features: features
                .iter()
                .map(|feature| GeoJsonFeature {
                    kind: "Feature",
                    properties: feature,
                    geometry: Geometry::from(&feature.geometry),
                })
                .collect(),
        }
    }
}

/// Paths written by [`write_feature_collection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtefacts {
    /// The feature collection.
    pub geojson: Utf8PathBuf,
    /// The attribution notice.
    pub attribution: Utf8PathBuf,
}

/// Errors returned while writing output.
#[derive(Debug, Error)]
pub enum GeoJsonWriteError {
    /// The output directory could not be created.
    #[error("failed to create output directory {path:?}")]
    CreateDir {
        /// Requested directory.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The collection could not be serialised.
    #[error("failed to serialise feature collection")]
    Serialise(#[source] serde_json::Error),
    /// A file could not be written.
    #[error("failed to write {path:?}")]
    Write {
        /// Target file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Write `features` as pretty-printed GeoJSON plus the attribution notice
/// into `output_dir`, creating it when needed.
///
/// # Errors
/// Returns a [`GeoJsonWriteError`] naming the step and path that failed.
pub fn write_feature_collection(
    output_dir: &Utf8Path,
    features: &[Feature],
) -> Result<WrittenArtefacts, GeoJsonWriteError> {
    campusmap_fs::create_dir_all(output_dir).map_err(|source| GeoJsonWriteError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut document = serde_json::to_vec_pretty(&FeatureCollection::new(features))
        .map_err(GeoJsonWriteError::Serialise)?;
    document.push(b'\n');
    let geojson = output_dir.join(GEOJSON_FILE);
    write(&geojson, &document)?;

    let attribution = output_dir.join(ATTRIBUTION_FILE);
    write(&attribution, ATTRIBUTION.as_bytes())?;

    info!("Wrote {} features to {geojson}", features.len());
    Ok(WrittenArtefacts {
        geojson,
        attribution,
    })
}

fn write(path: &Utf8Path, contents: &[u8]) -> Result<(), GeoJsonWriteError> {
    campusmap_fs::write_atomically(path, contents).map_err(|source| GeoJsonWriteError::Write {
        path: path.to_path_buf(),
        source,
    })
}
