//! Raw topology elements as delivered by the upstream element source.
//!
//! The model mirrors OpenStreetMap's node/way/relation triad. Coordinates are
//! WGS84 with `x = longitude` and `y = latitude`. Elements are decoded with an
//! internal `type` discriminator, so a record without one is rejected at the
//! boundary rather than reaching the assembler.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Free-form key/value tags.
///
/// An absent key is distinct from a key carrying an empty value.
pub type Tags = BTreeMap<String, String>;

/// Return a tag value when the key is present and the value is not blank.
///
/// # Examples
/// ```
/// use campusmap_core::{Tags, element::non_empty_tag};
///
/// let tags = Tags::from([("name".into(), "Royce Hall".into()), ("ref".into(), " ".into())]);
/// assert_eq!(non_empty_tag(&tags, "name"), Some("Royce Hall"));
/// assert_eq!(non_empty_tag(&tags, "ref"), None);
/// assert_eq!(non_empty_tag(&tags, "operator"), None);
/// ```
#[must_use]
pub fn non_empty_tag<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Discriminates the three element families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A single coordinate.
    Node,
    /// An ordered list of node references.
    Way,
    /// A composite of other elements with roles.
    Relation,
}

impl ElementKind {
    /// Lowercase wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to a raw element, rendered as `kind/id` (e.g. `way/42`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRef {
    /// Element family.
    pub kind: ElementKind,
    /// Upstream identifier, unique within its family.
    pub id: i64,
}

impl ElementRef {
    /// Reference a way.
    #[must_use]
    pub const fn way(id: i64) -> Self {
        Self {
            kind: ElementKind::Way,
            id,
        }
    }

    /// Reference a relation.
    #[must_use]
    pub const fn relation(id: i64) -> Self {
        Self {
            kind: ElementKind::Relation,
            id,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

impl Serialize for ElementRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when parsing an [`ElementRef`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid element reference {input:?}; expected `node/<id>`, `way/<id>` or `relation/<id>`")]
pub struct ParseElementRefError {
    /// Rejected input.
    pub input: String,
}

impl FromStr for ElementRef {
    type Err = ParseElementRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseElementRefError {
            input: s.to_owned(),
        };
        let (kind_text, id_text) = s.trim().split_once('/').ok_or_else(invalid)?;
        let kind = match kind_text {
            "node" => ElementKind::Node,
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            _ => return Err(invalid()),
        };
        let id = id_text.parse::<i64>().map_err(|_| invalid())?;
        Ok(Self { kind, id })
    }
}

/// A located point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: i64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Optional tags.
    #[serde(default)]
    pub tags: Tags,
}

/// An ordered sequence of node references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    /// Way identifier.
    pub id: i64,
    /// Node identifiers in boundary order.
    #[serde(default)]
    pub nodes: Vec<i64>,
    /// Optional tags.
    #[serde(default)]
    pub tags: Tags,
}

/// Role a member plays inside a multipolygon relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Contributes to the exterior boundary.
    Outer,
    /// Contributes a hole.
    Inner,
    /// Any other role, including an empty one.
    #[default]
    #[serde(other)]
    Other,
}

/// A relation member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Family of the referenced element.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Identifier of the referenced element.
    #[serde(rename = "ref")]
    pub reference: i64,
    /// Role of the member.
    #[serde(default)]
    pub role: MemberRole,
}

impl Member {
    /// Construct a way member with the given role.
    #[must_use]
    pub const fn way(reference: i64, role: MemberRole) -> Self {
        Self {
            kind: ElementKind::Way,
            reference,
            role,
        }
    }
}

/// A composite element referencing other elements with roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation identifier.
    pub id: i64,
    /// Ordered members.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Optional tags.
    #[serde(default)]
    pub tags: Tags,
}

/// One raw topology record.
///
/// # Examples
/// ```
/// use campusmap_core::RawElement;
///
/// let json = r#"{"type": "way", "id": 7, "nodes": [1, 2, 3, 1], "tags": {"building": "yes"}}"#;
/// let element: RawElement = serde_json::from_str(json).unwrap();
/// assert_eq!(element.element_ref().to_string(), "way/7");
///
/// let untyped = r#"{"id": 7, "nodes": [1, 2, 3, 1]}"#;
/// assert!(serde_json::from_str::<RawElement>(untyped).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    /// A node record.
    Node(Node),
    /// A way record.
    Way(Way),
    /// A relation record.
    Relation(Relation),
}

impl RawElement {
    /// Family of the element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Node(_) => ElementKind::Node,
            Self::Way(_) => ElementKind::Way,
            Self::Relation(_) => ElementKind::Relation,
        }
    }

    /// Identifier of the element within its family.
    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Node(node) => node.id,
            Self::Way(way) => way.id,
            Self::Relation(relation) => relation.id,
        }
    }

    /// Typed reference to the element.
    #[must_use]
    pub const fn element_ref(&self) -> ElementRef {
        ElementRef {
            kind: self.kind(),
            id: self.id(),
        }
    }

    /// Tags attached to the element.
    #[must_use]
    pub const fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => &node.tags,
            Self::Way(way) => &way.tags,
            Self::Relation(relation) => &relation.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("way/12", ElementRef::way(12))]
    #[case("relation/7493269", ElementRef::relation(7_493_269))]
    #[case(" way/-3 ", ElementRef::way(-3))]
    fn parses_element_refs(#[case] input: &str, #[case] expected: ElementRef) {
        assert_eq!(input.parse::<ElementRef>(), Ok(expected));
    }

    #[rstest]
    #[case("way")]
    #[case("area/12")]
    #[case("way/twelve")]
    fn rejects_malformed_element_refs(#[case] input: &str) {
        assert!(input.parse::<ElementRef>().is_err());
    }

    #[rstest]
    fn element_refs_render_as_kind_and_id() {
        assert_eq!(ElementRef::relation(5).to_string(), "relation/5");
    }

    #[rstest]
    fn decodes_relation_members_with_unknown_roles() {
        let json = r#"{
            "type": "relation",
            "id": 9,
            "members": [
                {"type": "way", "ref": 1, "role": "outer"},
                {"type": "way", "ref": 2, "role": "inner"},
                {"type": "node", "ref": 3, "role": "label"},
                {"type": "way", "ref": 4}
            ],
            "tags": {"type": "multipolygon"}
        }"#;
        let element: RawElement = serde_json::from_str(json).expect("relation should decode");
        let RawElement::Relation(relation) = element else {
            panic!("expected a relation");
        };
        let roles: Vec<MemberRole> = relation.members.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MemberRole::Outer,
                MemberRole::Inner,
                MemberRole::Other,
                MemberRole::Other
            ]
        );
    }

    #[rstest]
    fn blank_tags_count_as_missing() {
        let tags = Tags::from([("name".to_owned(), String::new())]);
        assert!(tags.contains_key("name"));
        assert_eq!(non_empty_tag(&tags, "name"), None);
    }
}
