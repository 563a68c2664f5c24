//! Overpass JSON payloads.

use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use campusmap_core::RawElement;
use campusmap_fs::open_utf8_file;
use log::info;
use serde::Deserialize;
use thiserror::Error;

/// The `elements` array of an Overpass `[out:json]` response.
///
/// Every element must carry a `type` discriminator; a payload containing an
/// untyped element is rejected as a whole.
///
/// # Examples
/// ```
/// use campusmap_data::OverpassPayload;
///
/// let payload = OverpassPayload::from_json(r#"{
///     "version": 0.6,
///     "elements": [{"type": "node", "id": 1, "lon": -118.44, "lat": 34.07}]
/// }"#).unwrap();
/// assert_eq!(payload.elements.len(), 1);
/// assert!(OverpassPayload::from_json(r#"{"elements": [{"id": 1}]}"#).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverpassPayload {
    /// Raw elements in response order.
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

/// Errors returned while loading a payload from disk.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// The file could not be opened.
    #[error("failed to open Overpass payload at {path:?}")]
    Open {
        /// Location of the payload.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid payload.
    #[error("failed to decode Overpass payload at {path:?}")]
    Decode {
        /// Location of the payload.
        path: Utf8PathBuf,
        /// Decoding failure, including untyped elements.
        #[source]
        source: serde_json::Error,
    },
}

impl OverpassPayload {
    /// Decode a payload from JSON text.
    ///
    /// # Errors
    /// Fails when the text is not a payload or an element lacks its `type`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read and decode the payload stored at `path`.
    ///
    /// # Errors
    /// Returns [`OverpassError::Open`] when the file cannot be opened and
    /// [`OverpassError::Decode`] when its contents are not a payload.
    pub fn read(path: &Utf8Path) -> Result<Self, OverpassError> {
        let file = open_utf8_file(path).map_err(|source| OverpassError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let payload: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                OverpassError::Decode {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        info!("Read {} elements from {path}", payload.elements.len());
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusmap_core::{ElementRef, MemberRole};
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn decodes_every_element_family() {
        let payload = OverpassPayload::from_json(
            r#"{"elements": [
                {"type": "node", "id": 1, "lon": 0.0, "lat": 0.0},
                {"type": "way", "id": 2, "nodes": [1], "tags": {"building": "yes"}},
                {"type": "relation", "id": 3,
                 "members": [{"type": "way", "ref": 2, "role": "outer"},
                             {"type": "way", "ref": 4, "role": ""}]}
            ]}"#,
        )
        .expect("payload decodes");
        let refs: Vec<String> = payload
            .elements
            .iter()
            .map(|element| element.element_ref().to_string())
            .collect();
        assert_eq!(refs, vec!["node/1", "way/2", "relation/3"]);
        let Some(RawElement::Relation(relation)) = payload.elements.last() else {
            panic!("last element is a relation");
        };
        let roles: Vec<MemberRole> = relation.members.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![MemberRole::Outer, MemberRole::Other]);
        assert_eq!(
            payload.elements.get(1).map(RawElement::element_ref),
            Some(ElementRef::way(2))
        );
    }

    #[rstest]
    fn missing_elements_array_is_empty() {
        let payload = OverpassPayload::from_json(r#"{"remark": "timeout"}"#).expect("decodes");
        assert!(payload.elements.is_empty());
    }

    #[rstest]
    fn reports_the_path_of_unreadable_payloads() {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
        let path = root.join("broken.json");
        std::fs::write(&path, b"{\"elements\": [{\"id\": 5}]}").expect("write");
        let err = OverpassPayload::read(&path).expect_err("untyped element");
        assert!(matches!(err, OverpassError::Decode { path: ref at, .. } if *at == path));

        let missing = root.join("missing.json");
        let err = OverpassPayload::read(&missing).expect_err("missing file");
        assert!(matches!(err, OverpassError::Open { .. }));
    }
}
