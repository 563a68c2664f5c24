//! Display names and aliases.

use serde::{Deserialize, Serialize};

use crate::element::{Tags, non_empty_tag};

/// Name given to features that carry no usable name tag.
pub const PLACEHOLDER_NAME: &str = "Unnamed Building";

/// Tags consulted for a display name, most authoritative first.
const NAME_KEYS: [&str; 6] = ["name", "official_name", "alt_name", "loc_name", "ref", "operator"];

/// Tags whose `;`-separated values become aliases, before `ref`.
const ALIAS_KEYS: [&str; 3] = ["alt_name", "short_name", "old_name"];

/// Where a display name came from. Ordered from weakest to strongest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NameOrigin {
    /// The generic placeholder.
    #[default]
    Placeholder,
    /// Synthesised from other tags, such as a numbered parking structure.
    Derived,
    /// Read from a name-bearing tag.
    Tagged,
}

/// A display name and its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Display name.
    pub name: String,
    /// Provenance of `name`.
    pub origin: NameOrigin,
    /// Tag key `name` was read from, when tagged.
    pub source: Option<&'static str>,
}

impl ResolvedName {
    /// Whether the name is the placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.origin == NameOrigin::Placeholder
    }
}

/// First non-blank name-bearing tag, or the placeholder.
///
/// # Examples
/// ```
/// use campusmap_core::{NameOrigin, Tags, resolve_name};
///
/// let tags = Tags::from([("ref".into(), "MS".into()), ("official_name".into(), "Mathematical Sciences".into())]);
/// let resolved = resolve_name(&tags);
/// assert_eq!(resolved.name, "Mathematical Sciences");
/// assert_eq!(resolved.origin, NameOrigin::Tagged);
/// assert_eq!(resolve_name(&Tags::new()).name, "Unnamed Building");
/// ```
#[must_use]
pub fn resolve_name(tags: &Tags) -> ResolvedName {
    NAME_KEYS
        .iter()
        .find_map(|key| non_empty_tag(tags, key).map(|name| (*key, name)))
        .map_or_else(
            || ResolvedName {
                name: PLACEHOLDER_NAME.to_owned(),
                origin: NameOrigin::Placeholder,
                source: None,
            },
            |(key, name)| ResolvedName {
                name: name.trim().to_owned(),
                origin: NameOrigin::Tagged,
                source: Some(key),
            },
        )
}

/// Final display name for a feature.
///
/// Parking that is unnamed, or known only by its `ref`, becomes
/// [`parking_structure_name`]. Every other name is kept as resolved.
///
/// # Examples
/// ```
/// use campusmap_core::{NameOrigin, Tags, display_name, resolve_name};
///
/// let garage = Tags::from([("amenity".into(), "parking".into()), ("ref".into(), "PS 8".into())]);
/// let shown = display_name(resolve_name(&garage), &garage);
/// assert_eq!(shown.name, "Parking Structure 8");
/// assert_eq!(shown.origin, NameOrigin::Derived);
/// ```
#[must_use]
pub fn display_name(resolved: ResolvedName, tags: &Tags) -> ResolvedName {
    if matches!(resolved.source, None | Some("ref")) && is_parking(tags) {
        ResolvedName {
            name: parking_structure_name(tags),
            origin: NameOrigin::Derived,
            source: None,
        }
    } else {
        resolved
    }
}

/// Whether the tags describe a parking facility eligible for renaming.
#[must_use]
pub fn is_parking(tags: &Tags) -> bool {
    let lowered = |key: &str| tags.get(key).map(|value| value.to_lowercase());
    lowered("amenity").as_deref() == Some("parking")
        || lowered("building").as_deref() == Some("parking")
        || matches!(
            lowered("parking").as_deref(),
            Some("multi-storey" | "underground")
        )
}

/// `Parking Structure N` from the first standalone one- or two-digit number
/// in `ref`, or plain `Parking Structure`.
///
/// # Examples
/// ```
/// use campusmap_core::{Tags, parking_structure_name};
///
/// let tags = |r: &str| Tags::from([("ref".into(), r.into())]);
/// assert_eq!(parking_structure_name(&tags("P8")), "Parking Structure 8");
/// assert_eq!(parking_structure_name(&tags("Lot 123; 4")), "Parking Structure 4");
/// assert_eq!(parking_structure_name(&Tags::new()), "Parking Structure");
/// ```
#[must_use]
pub fn parking_structure_name(tags: &Tags) -> String {
    let number = tags
        .get("ref")
        .and_then(|reference| first_short_number(reference.trim()));
    match number {
        Some(digits) => format!("Parking Structure {digits}"),
        None => "Parking Structure".to_owned(),
    }
}

fn first_short_number(text: &str) -> Option<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| (1..=2).contains(&run.len()))
}

/// Aliases from `alt_name`, `short_name`, `old_name` and `ref`, without
/// blanks, duplicates, or the display name itself.
#[must_use]
pub fn collect_aliases(tags: &Tags, display_name: &str) -> Vec<String> {
    let display = display_name.to_lowercase();
    let split = ALIAS_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .flat_map(|value| value.split(';'));
    let mut aliases: Vec<String> = Vec::new();
    for alias in split.chain(tags.get("ref").map(String::as_str)) {
        let trimmed = alias.trim();
        if trimmed.is_empty() || trimmed.to_lowercase() == display {
            continue;
        }
        if !aliases.iter().any(|existing| existing == trimmed) {
            aliases.push(trimmed.to_owned());
        }
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    #[case(&[("name", "Kerckhoff Hall"), ("ref", "KH")], "Kerckhoff Hall")]
    #[case(&[("name", "  "), ("alt_name", "YRL")], "YRL")]
    #[case(&[("operator", "UCLA Transportation")], "UCLA Transportation")]
    fn resolves_the_first_usable_name(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        let resolved = resolve_name(&tags(pairs));
        assert_eq!(resolved.name, expected);
        assert!(!resolved.is_placeholder());
    }

    #[rstest]
    #[case(&[("amenity", "parking"), ("ref", "PS 3")], "Parking Structure 3", NameOrigin::Derived)]
    #[case(&[("building", "parking")], "Parking Structure", NameOrigin::Derived)]
    #[case(&[("amenity", "parking"), ("name", "Lot 36"), ("ref", "36")], "Lot 36", NameOrigin::Tagged)]
    #[case(&[("amenity", "parking"), ("operator", "UCLA Transportation")], "UCLA Transportation", NameOrigin::Tagged)]
    #[case(&[("building", "yes"), ("ref", "MS")], "MS", NameOrigin::Tagged)]
    #[case(&[("building", "yes")], PLACEHOLDER_NAME, NameOrigin::Placeholder)]
    fn parking_known_only_by_ref_is_renamed(
        #[case] pairs: &[(&str, &str)],
        #[case] expected: &str,
        #[case] origin: NameOrigin,
    ) {
        let element = tags(pairs);
        let shown = display_name(resolve_name(&element), &element);
        assert_eq!(shown.name, expected);
        assert_eq!(shown.origin, origin);
    }

    #[rstest]
    fn resolved_names_remember_their_tag() {
        let resolved = resolve_name(&tags(&[("loc_name", "The Hill"), ("ref", "H")]));
        assert_eq!(resolved.source, Some("loc_name"));
        assert_eq!(resolve_name(&Tags::new()).source, None);
    }

    #[rstest]
    fn placeholder_ranks_below_derived_and_tagged() {
        assert!(NameOrigin::Placeholder < NameOrigin::Derived);
        assert!(NameOrigin::Derived < NameOrigin::Tagged);
    }

    #[rstest]
    #[case(&[("amenity", "parking")], true)]
    #[case(&[("building", "Parking")], true)]
    #[case(&[("parking", "underground")], true)]
    #[case(&[("parking", "surface")], false)]
    #[case(&[("building", "yes")], false)]
    fn detects_parking(#[case] pairs: &[(&str, &str)], #[case] expected: bool) {
        assert_eq!(is_parking(&tags(pairs)), expected);
    }

    #[rstest]
    #[case("PS 3", "Parking Structure 3")]
    #[case("p 14", "Parking Structure 14")]
    #[case("2021", "Parking Structure")]
    #[case("Lot 36", "Parking Structure 36")]
    fn numbers_parking_structures(#[case] reference: &str, #[case] expected: &str) {
        assert_eq!(parking_structure_name(&tags(&[("ref", reference)])), expected);
    }

    #[rstest]
    fn aliases_skip_the_display_name_and_duplicates() {
        let library = tags(&[
            ("alt_name", "YRL; Research Library ;yrl"),
            ("short_name", "yrl"),
            ("old_name", "University Research Library;"),
            ("ref", "Young Research Library"),
        ]);
        assert_eq!(
            collect_aliases(&library, "Young Research Library"),
            vec!["YRL", "Research Library", "yrl", "University Research Library"]
        );
    }
}
