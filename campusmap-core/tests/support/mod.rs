//! Topology fixtures laid out in metres around the default projection origin.

use campusmap_core::{
    ElementRef, Feature, LocalProjection, Member, MemberRole, Node, RawElement, Relation, Tags,
    Way,
};
use geo::Coord;

/// Incrementally built list of raw elements.
#[derive(Debug, Default)]
pub struct Topology {
    elements: Vec<RawElement>,
    next_node: i64,
    projection: LocalProjection,
}

/// Owned tag map from borrowed pairs.
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

impl Topology {
    /// Add a node `east_m` and `north_m` from the origin and return its id.
    pub fn node(&mut self, east_m: f64, north_m: f64) -> i64 {
        self.next_node += 1;
        let at = self.projection.unproject(Coord {
            x: east_m,
            y: north_m,
        });
        self.elements.push(RawElement::Node(Node {
            id: self.next_node,
            lon: at.x,
            lat: at.y,
            tags: Tags::new(),
        }));
        self.next_node
    }

    /// Add a way over existing node ids.
    pub fn path(&mut self, id: i64, nodes: Vec<i64>, pairs: &[(&str, &str)]) {
        self.elements.push(RawElement::Way(Way {
            id,
            nodes,
            tags: tags(pairs),
        }));
    }

    /// Add a closed rectangular way.
    #[expect(clippy::float_arithmetic, reason = "corners are offsets in metres")]
    pub fn rectangle(
        &mut self,
        id: i64,
        (east_m, north_m): (f64, f64),
        (width_m, height_m): (f64, f64),
        pairs: &[(&str, &str)],
    ) {
        let a = self.node(east_m, north_m);
        let b = self.node(east_m + width_m, north_m);
        let c = self.node(east_m + width_m, north_m + height_m);
        let d = self.node(east_m, north_m + height_m);
        self.path(id, vec![a, b, c, d, a], pairs);
    }

    /// Add a relation over way members.
    pub fn relation(&mut self, id: i64, members: &[(i64, MemberRole)], pairs: &[(&str, &str)]) {
        self.elements.push(RawElement::Relation(Relation {
            id,
            members: members
                .iter()
                .map(|&(reference, role)| Member::way(reference, role))
                .collect(),
            tags: tags(pairs),
        }));
    }

    /// Everything added so far.
    pub fn elements(&self) -> &[RawElement] {
        &self.elements
    }
}

/// The feature produced by `origin`, if any.
pub fn feature_from(features: &[Feature], origin: ElementRef) -> Option<&Feature> {
    features
        .iter()
        .find(|feature| feature.origins.contains(&origin))
}

/// The feature with display name `name`.
pub fn named<'a>(features: &'a [Feature], name: &str) -> &'a Feature {
    features
        .iter()
        .find(|feature| feature.name == name)
        .unwrap_or_else(|| panic!("no feature named {name}"))
}
