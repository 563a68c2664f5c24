//! Topology assembly: raw nodes, ways and relations into polygons.
//!
//! Closed ways become polygons. Open ways are kept as line fragments for
//! relation stitching. Relations union their outer members, subtract their
//! inner members, and report which ways they subsume. Every structural defect
//! is skipped with a [`Diagnostic`]; a relation with an unusable outer member
//! is never partially emitted.

mod stitch;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon, unary_union};
use log::{debug, info, warn};

use crate::diagnostics::Diagnostic;
use crate::element::{ElementKind, ElementRef, MemberRole, Relation, RawElement, Tags, Way};
use crate::geometry::{close, distinct_count, is_simple_ring, normalise};

use stitch::stitch;

/// Output of [`assemble_topology`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyAssembly {
    way_polygons: BTreeMap<i64, Polygon<f64>>,
    way_lines: BTreeMap<i64, LineString<f64>>,
    invalid_ways: BTreeSet<i64>,
    relation_polygons: BTreeMap<i64, MultiPolygon<f64>>,
    subsumed_ways: BTreeSet<i64>,
    hole_ways: BTreeSet<i64>,
    diagnostics: Vec<Diagnostic>,
}

impl TopologyAssembly {
    /// Polygon built from a closed (or auto-closed) way.
    #[must_use]
    pub fn way_polygon(&self, way: i64) -> Option<&Polygon<f64>> {
        self.way_polygons.get(&way)
    }

    /// Line fragment of an open way.
    #[must_use]
    pub fn way_line(&self, way: i64) -> Option<&LineString<f64>> {
        self.way_lines.get(&way)
    }

    /// Polygon assembled for a relation.
    #[must_use]
    pub fn relation_polygon(&self, relation: i64) -> Option<&MultiPolygon<f64>> {
        self.relation_polygons.get(&relation)
    }

    /// Geometry for an element, if it assembled.
    #[must_use]
    pub fn geometry(&self, element: ElementRef) -> Option<MultiPolygon<f64>> {
        match element.kind {
            ElementKind::Way => self
                .way_polygon(element.id)
                .map(|polygon| MultiPolygon::new(vec![polygon.clone()])),
            ElementKind::Relation => self.relation_polygon(element.id).cloned(),
            ElementKind::Node => None,
        }
    }

    /// Ways with missing nodes or invalid rings.
    #[must_use]
    pub const fn invalid_ways(&self) -> &BTreeSet<i64> {
        &self.invalid_ways
    }

    /// Outer ways of assembled building or stadium relations.
    #[must_use]
    pub const fn subsumed_ways(&self) -> &BTreeSet<i64> {
        &self.subsumed_ways
    }

    /// Ways referenced only as inner members.
    #[must_use]
    pub const fn hole_ways(&self) -> &BTreeSet<i64> {
        &self.hole_ways
    }

    /// Structural defects in input order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take ownership of the diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

/// Whether a relation's outer ways must not also be emitted on their own.
#[must_use]
pub fn subsumes_outer_ways(tags: &Tags) -> bool {
    tags.contains_key("building") || tags.get("leisure").is_some_and(|value| value == "stadium")
}

/// Assemble every way and relation in `elements`.
///
/// # Examples
/// ```
/// use campusmap_core::{RawElement, assemble_topology};
///
/// let elements: Vec<RawElement> = serde_json::from_str(r#"[
///     {"type": "node", "id": 1, "lon": 0.0, "lat": 0.0},
///     {"type": "node", "id": 2, "lon": 0.001, "lat": 0.0},
///     {"type": "node", "id": 3, "lon": 0.001, "lat": 0.001},
///     {"type": "way", "id": 10, "nodes": [1, 2, 3, 1], "tags": {"building": "yes"}},
///     {"type": "way", "id": 11, "nodes": [1, 2, 99]}
/// ]"#).unwrap();
///
/// let assembly = assemble_topology(&elements);
/// assert!(assembly.way_polygon(10).is_some());
/// assert!(assembly.invalid_ways().contains(&11));
/// assert_eq!(assembly.diagnostics().len(), 1);
/// ```
#[must_use]
pub fn assemble_topology(elements: &[RawElement]) -> TopologyAssembly {
    let nodes: HashMap<i64, Coord<f64>> = elements
        .iter()
        .filter_map(|element| match element {
            RawElement::Node(node) => validated_coord(node.lon, node.lat).map(|at| (node.id, at)),
            RawElement::Way(_) | RawElement::Relation(_) => None,
        })
        .collect();
    let relation_members: HashSet<i64> = elements
        .iter()
        .filter_map(|element| match element {
            RawElement::Relation(relation) => Some(relation),
            RawElement::Node(_) | RawElement::Way(_) => None,
        })
        .flat_map(|relation| way_members(relation).map(|(id, _)| id))
        .collect();

    let mut assembly = TopologyAssembly::default();
    for element in elements {
        if let RawElement::Way(way) = element {
            assemble_way(&mut assembly, way, &nodes, &relation_members);
        }
    }

    let mut outer_refs = HashSet::new();
    let mut inner_refs = BTreeSet::new();
    for element in elements {
        let RawElement::Relation(relation) = element else {
            continue;
        };
        for (id, role) in way_members(relation) {
            match role {
                MemberRole::Outer => {
                    outer_refs.insert(id);
                }
                MemberRole::Inner => {
                    inner_refs.insert(id);
                }
                MemberRole::Other => {}
            }
        }
        assemble_relation(&mut assembly, relation);
    }
    assembly.hole_ways = inner_refs
        .into_iter()
        .filter(|id| !outer_refs.contains(id))
        .collect();

    info!(
        "Assembled {} way polygons and {} relation polygons ({} diagnostics)",
        assembly.way_polygons.len(),
        assembly.relation_polygons.len(),
        assembly.diagnostics.len()
    );
    assembly
}

fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    (lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat))
    .then_some(Coord { x: lon, y: lat })
}

fn way_members(relation: &Relation) -> impl Iterator<Item = (i64, MemberRole)> + '_ {
    relation
        .members
        .iter()
        .filter(|member| member.kind == ElementKind::Way)
        .map(|member| (member.reference, member.role))
}

fn assemble_way(
    assembly: &mut TopologyAssembly,
    way: &Way,
    nodes: &HashMap<i64, Coord<f64>>,
    relation_members: &HashSet<i64>,
) {
    let reference = ElementRef::way(way.id);
    let missing: Vec<i64> = way
        .nodes
        .iter()
        .filter(|id| !nodes.contains_key(*id))
        .copied()
        .collect();
    if !missing.is_empty() {
        assembly.invalid_ways.insert(way.id);
        assembly.report(Diagnostic::MissingNodes {
            way: reference,
            missing,
        });
        return;
    }
    let coords: Vec<Coord<f64>> = way
        .nodes
        .iter()
        .filter_map(|id| nodes.get(id).copied())
        .collect();

    let is_open = coords.first() != coords.last();
    if is_open {
        assembly
            .way_lines
            .insert(way.id, LineString::new(coords.clone()));
        if relation_members.contains(&way.id) {
            debug!("{reference} kept as a line fragment for stitching");
            return;
        }
    }

    if distinct_count(&coords) < 3 {
        if !is_open {
            assembly.invalid_ways.insert(way.id);
            assembly.report(Diagnostic::InvalidRing { way: reference });
        }
        return;
    }
    let ring = LineString::new(close(coords));
    if is_simple_ring(&ring) {
        assembly
            .way_polygons
            .insert(way.id, Polygon::new(ring, Vec::new()));
    } else {
        assembly.invalid_ways.insert(way.id);
        assembly.report(Diagnostic::InvalidRing { way: reference });
    }
}

/// Resolved members of one role.
#[derive(Default)]
struct MemberShapes {
    polygons: Vec<Polygon<f64>>,
    fragments: Vec<LineString<f64>>,
    ways: Vec<i64>,
}

fn assemble_relation(assembly: &mut TopologyAssembly, relation: &Relation) {
    if relation.members.is_empty() {
        return;
    }
    let reference = ElementRef::relation(relation.id);
    let (outer, inner, notes) = match collect_members(assembly, relation) {
        Ok(members) => members,
        Err(diagnostic) => {
            assembly.report(diagnostic);
            return;
        }
    };
    for note in notes {
        assembly.report(note);
    }
    if outer.ways.is_empty() {
        assembly.report(Diagnostic::NoOuterMembers {
            relation: reference,
        });
        return;
    }

    let (outer_rings, outer_waste) = close_fragments(outer.polygons, &outer.fragments);
    if outer_waste > 0 {
        // A partial outline would misstate the footprint; skip the relation.
        assembly.report(Diagnostic::UnclosedFragments {
            relation: reference,
            chains: outer_waste,
        });
        return;
    }
    let (inner_rings, inner_waste) = close_fragments(inner.polygons, &inner.fragments);
    if inner_waste > 0 {
        assembly.report(Diagnostic::UnclosedFragments {
            relation: reference,
            chains: inner_waste,
        });
    }
    if outer_rings.is_empty() {
        assembly.report(Diagnostic::NoClosedOuterRing {
            relation: reference,
        });
        return;
    }

    let shell = unary_union(outer_rings.iter());
    let body = if inner_rings.is_empty() {
        shell
    } else {
        shell.difference(&unary_union(inner_rings.iter()))
    };
    let Some(geometry) = normalise(&body) else {
        assembly.report(Diagnostic::EmptyAfterSubtraction {
            relation: reference,
        });
        return;
    };

    if subsumes_outer_ways(&relation.tags) {
        assembly.subsumed_ways.extend(outer.ways.iter().copied());
    }
    assembly.relation_polygons.insert(relation.id, geometry);
}

type Members = (MemberShapes, MemberShapes, Vec<Diagnostic>);

/// Split way members by role, failing on the first unusable outer member.
fn collect_members(
    assembly: &TopologyAssembly,
    relation: &Relation,
) -> Result<Members, Diagnostic> {
    let reference = ElementRef::relation(relation.id);
    let mut outer = MemberShapes::default();
    let mut inner = MemberShapes::default();
    let mut notes = Vec::new();
    for (id, role) in way_members(relation) {
        let target = match role {
            MemberRole::Outer => &mut outer,
            MemberRole::Inner => &mut inner,
            MemberRole::Other => continue,
        };
        if let Some(polygon) = assembly.way_polygons.get(&id) {
            target.polygons.push(polygon.clone());
        } else if let Some(line) = assembly.way_lines.get(&id) {
            target.fragments.push(line.clone());
        } else if role == MemberRole::Outer {
            return Err(Diagnostic::UnassemblableRelation {
                relation: reference,
                member: ElementRef::way(id),
            });
        } else {
            notes.push(Diagnostic::MissingInnerMember {
                relation: reference,
                member: ElementRef::way(id),
            });
            continue;
        }
        target.ways.push(id);
    }
    Ok((outer, inner, notes))
}

fn close_fragments(
    mut polygons: Vec<Polygon<f64>>,
    fragments: &[LineString<f64>],
) -> (Vec<Polygon<f64>>, usize) {
    if fragments.is_empty() {
        return (polygons, 0);
    }
    let stitched = stitch(fragments);
    polygons.extend(
        stitched
            .rings
            .into_iter()
            .map(|ring| Polygon::new(ring, Vec::new())),
    );
    (polygons, stitched.unusable_chains)
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare areas with a tolerance"
)]
mod tests {
    use super::*;
    use crate::element::{Member, Node};
    use geo::Area;
    use rstest::{fixture, rstest};

    fn node(id: i64, lon: f64, lat: f64) -> RawElement {
        RawElement::Node(Node {
            id,
            lon,
            lat,
            tags: Tags::new(),
        })
    }

    fn way(id: i64, nodes: &[i64], tags: &[(&str, &str)]) -> RawElement {
        RawElement::Way(Way {
            id,
            nodes: nodes.to_vec(),
            tags: tags
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        })
    }

    fn relation(id: i64, members: Vec<Member>, tags: &[(&str, &str)]) -> RawElement {
        RawElement::Relation(Relation {
            id,
            members,
            tags: tags
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        })
    }

    /// A 10x10 outer square (nodes 1-4) and a 2x2 inner square (nodes 5-8).
    #[fixture]
    fn squares() -> Vec<RawElement> {
        vec![
            node(1, 0.0, 0.0),
            node(2, 10.0, 0.0),
            node(3, 10.0, 10.0),
            node(4, 0.0, 10.0),
            node(5, 4.0, 4.0),
            node(6, 6.0, 4.0),
            node(7, 6.0, 6.0),
            node(8, 4.0, 6.0),
        ]
    }

    #[rstest]
    fn subtracts_inner_rings(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3, 4, 1], &[]),
            way(11, &[5, 6, 7, 8, 5], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(11, MemberRole::Inner),
                ],
                &[("building", "yes")],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        let polygon = assembly.relation_polygon(20).expect("relation assembles");
        assert!((polygon.unsigned_area() - 96.0).abs() < 1e-9);
        assert!(assembly.subsumed_ways().contains(&10));
        assert!(assembly.hole_ways().contains(&11));
        assert!(assembly.diagnostics().is_empty());
    }

    #[rstest]
    fn stitches_outer_fragments(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3], &[]),
            way(11, &[3, 4, 1], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(11, MemberRole::Outer),
                ],
                &[("leisure", "stadium")],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        let polygon = assembly.relation_polygon(20).expect("fragments close");
        assert!((polygon.unsigned_area() - 100.0).abs() < 1e-9);
        assert!(assembly.way_polygon(10).is_none());
        assert!(assembly.way_line(10).is_some());
        assert_eq!(
            assembly.subsumed_ways().iter().copied().collect::<Vec<_>>(),
            vec![10, 11]
        );
    }

    #[rstest]
    fn skips_relations_with_missing_outer_members(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3, 4, 1], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(99, MemberRole::Outer),
                ],
                &[("building", "yes")],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        assert!(assembly.relation_polygon(20).is_none());
        assert!(assembly.subsumed_ways().is_empty());
        assert_eq!(
            assembly.diagnostics(),
            &[Diagnostic::UnassemblableRelation {
                relation: ElementRef::relation(20),
                member: ElementRef::way(99),
            }]
        );
    }

    #[rstest]
    fn ignores_missing_inner_members(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3, 4, 1], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(99, MemberRole::Inner),
                ],
                &[],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        assert!(assembly.relation_polygon(20).is_some());
        assert!(matches!(
            assembly.diagnostics(),
            [Diagnostic::MissingInnerMember { .. }]
        ));
    }

    #[rstest]
    fn drops_relations_whose_holes_cover_the_shell(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[5, 6, 7, 8, 5], &[]),
            way(11, &[1, 2, 3, 4, 1], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(11, MemberRole::Inner),
                ],
                &[("building", "yes")],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        assert!(assembly.relation_polygon(20).is_none());
        assert!(assembly.subsumed_ways().is_empty());
        assert!(matches!(
            assembly.diagnostics(),
            [Diagnostic::EmptyAfterSubtraction { .. }]
        ));
    }

    #[rstest]
    fn auto_closes_standalone_open_ways(squares: Vec<RawElement>) {
        let mut elements = squares;
        elements.push(way(10, &[1, 2, 3, 4], &[("building", "yes")]));
        let assembly = assemble_topology(&elements);
        let polygon = assembly.way_polygon(10).expect("open way auto-closes");
        assert!((polygon.unsigned_area() - 100.0).abs() < 1e-9);
    }

    #[rstest]
    fn rejects_self_intersecting_ways(squares: Vec<RawElement>) {
        let mut elements = squares;
        elements.push(way(10, &[1, 3, 2, 4, 1], &[]));
        let assembly = assemble_topology(&elements);
        assert!(assembly.way_polygon(10).is_none());
        assert!(assembly.invalid_ways().contains(&10));
        assert_eq!(
            assembly.diagnostics(),
            &[Diagnostic::InvalidRing {
                way: ElementRef::way(10)
            }]
        );
    }

    #[rstest]
    fn unclosed_outer_fragments_skip_the_relation(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3, 4, 1], &[]),
            way(11, &[5, 6], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(11, MemberRole::Outer),
                ],
                &[("type", "multipolygon"), ("building", "yes")],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        assert!(assembly.relation_polygon(20).is_none());
        assert!(assembly.subsumed_ways().is_empty());
        assert!(matches!(
            assembly.diagnostics(),
            [Diagnostic::UnclosedFragments { chains: 1, .. }]
        ));
    }

    #[rstest]
    fn unclosed_inner_fragments_are_noted(mut squares: Vec<RawElement>) {
        squares.extend([
            way(10, &[1, 2, 3, 4, 1], &[]),
            way(11, &[5, 6, 7], &[]),
            relation(
                20,
                vec![
                    Member::way(10, MemberRole::Outer),
                    Member::way(11, MemberRole::Inner),
                ],
                &[],
            ),
        ]);
        let assembly = assemble_topology(&squares);
        let polygon = assembly.relation_polygon(20).expect("outer ring survives");
        assert!((polygon.unsigned_area() - 100.0).abs() < 1e-9);
        assert!(matches!(
            assembly.diagnostics(),
            [Diagnostic::UnclosedFragments { chains: 1, .. }]
        ));
    }
}
