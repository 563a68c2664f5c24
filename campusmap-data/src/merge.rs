//! Fan-in of several payloads into one element collection.

use std::collections::HashSet;

use campusmap_core::{ElementRef, RawElement};
use log::debug;

use crate::OverpassPayload;

/// Concatenate payloads, keeping the first copy of each `(type, id)`.
///
/// Sub-queries over overlapping areas return the same elements more than
/// once; order of first appearance is preserved.
///
/// # Examples
/// ```
/// use campusmap_data::{OverpassPayload, merge_payloads};
///
/// let a = OverpassPayload::from_json(r#"{"elements": [{"type": "node", "id": 1, "lon": 0.0, "lat": 0.0}]}"#).unwrap();
/// let b = a.clone();
/// assert_eq!(merge_payloads([a, b]).len(), 1);
/// ```
#[must_use]
pub fn merge_payloads<I>(payloads: I) -> Vec<RawElement>
where
    I: IntoIterator<Item = OverpassPayload>,
{
    let mut seen: HashSet<ElementRef> = HashSet::new();
    let mut merged = Vec::new();
    let mut repeats = 0_usize;
    for element in payloads.into_iter().flat_map(|payload| payload.elements) {
        if seen.insert(element.element_ref()) {
            merged.push(element);
        } else {
            repeats += 1;
        }
    }
    debug!("Merged {} elements, dropped {repeats} repeats", merged.len());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn payload(json: &str) -> OverpassPayload {
        OverpassPayload::from_json(json).expect("payload decodes")
    }

    #[rstest]
    fn first_copy_wins_and_order_is_kept() {
        let first = payload(
            r#"{"elements": [
                {"type": "way", "id": 7, "nodes": [1, 2], "tags": {"name": "first"}},
                {"type": "node", "id": 7, "lon": 0.0, "lat": 0.0}
            ]}"#,
        );
        let second = payload(
            r#"{"elements": [
                {"type": "relation", "id": 9},
                {"type": "way", "id": 7, "nodes": [1, 2], "tags": {"name": "second"}}
            ]}"#,
        );
        let merged = merge_payloads([first, second]);
        let refs: Vec<String> = merged
            .iter()
            .map(|element| element.element_ref().to_string())
            .collect();
        assert_eq!(refs, vec!["way/7", "node/7", "relation/9"]);
        let name = merged
            .first()
            .and_then(|element| element.tags().get("name"))
            .map(String::as_str);
        assert_eq!(name, Some("first"));
    }
}
