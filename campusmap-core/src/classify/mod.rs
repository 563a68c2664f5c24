//! Ordered, first-match category classification.
//!
//! Rules are data: each [`CategoryRule`] pairs a category with a conjunction
//! of [`Condition`]s, and the static [`CATEGORY_RULES`] table is evaluated
//! top to bottom. The first satisfied rule decides the category. When nothing
//! matches, the zone supplies a default, and without a zone the answer is
//! [`Category::Unknown`]. Classification is therefore total and pure.

mod category;
mod rules;

use std::collections::BTreeMap;

use crate::element::{ElementRef, Tags, non_empty_tag};
use crate::zone::Zone;

pub use category::{Category, ParseCategoryError};
pub use rules::{CATEGORY_RULES, OFF_CAMPUS_LANDMARKS};

/// A single predicate over a feature's tags, name, zone or origin.
///
/// Tag values and the name are compared in lowercase; table literals are
/// expected to be lowercase already.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    /// The tag equals `value`.
    TagEquals {
        /// Tag key.
        key: &'a str,
        /// Expected lowercase value.
        value: &'a str,
    },
    /// The tag equals one of `values`.
    TagIn {
        /// Tag key.
        key: &'a str,
        /// Accepted lowercase values.
        values: &'a [&'a str],
    },
    /// The tag is present with a non-blank value.
    TagPresent {
        /// Tag key.
        key: &'a str,
    },
    /// The tag value contains `needle`.
    TagContains {
        /// Tag key.
        key: &'a str,
        /// Lowercase substring.
        needle: &'a str,
    },
    /// The name contains the substring.
    NameContains(&'a str),
    /// The name contains at least one of the substrings.
    NameContainsAny(&'a [&'a str]),
    /// The name contains one of the words as a whole word.
    NameHasWord(&'a [&'a str]),
    /// The feature was produced by one of the listed elements.
    ElementIn(&'a [ElementRef]),
    /// The feature lies in the zone.
    ZoneIs(Zone),
    /// At least one nested condition holds.
    AnyOf(&'a [Condition<'a>]),
    /// Every nested condition holds.
    AllOf(&'a [Condition<'a>]),
    /// The nested condition does not hold.
    Not(&'a Condition<'a>),
}

impl Condition<'_> {
    /// Evaluate the condition against a prepared context.
    #[must_use]
    pub fn holds(&self, context: &RuleContext<'_>) -> bool {
        match *self {
            Self::TagEquals { key, value } => context.tag(key).is_some_and(|tag| tag == value),
            Self::TagIn { key, values } => context
                .tag(key)
                .is_some_and(|tag| values.contains(&tag.as_str())),
            Self::TagPresent { key } => non_empty_tag(context.tags, key).is_some(),
            Self::TagContains { key, needle } => {
                context.tag(key).is_some_and(|tag| tag.contains(needle))
            }
            Self::NameContains(needle) => context.name.contains(needle),
            Self::NameContainsAny(needles) => {
                needles.iter().any(|needle| context.name.contains(needle))
            }
            Self::NameHasWord(words) => context.name_words().any(|word| words.contains(&word)),
            Self::ElementIn(elements) => context
                .origin
                .is_some_and(|origin| elements.contains(&origin)),
            Self::ZoneIs(zone) => context.zone == Some(zone),
            Self::AnyOf(conditions) => conditions.iter().any(|condition| condition.holds(context)),
            Self::AllOf(conditions) => conditions.iter().all(|condition| condition.holds(context)),
            Self::Not(condition) => !condition.holds(context),
        }
    }
}

/// An ordered `(category, conditions)` pair. All conditions must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule<'a> {
    /// Category assigned when the rule matches.
    pub category: Category,
    /// Conjunction of conditions.
    pub conditions: &'a [Condition<'a>],
}

impl<'a> CategoryRule<'a> {
    /// Construct a rule.
    #[must_use]
    pub const fn new(category: Category, conditions: &'a [Condition<'a>]) -> Self {
        Self {
            category,
            conditions,
        }
    }

    /// Whether every condition of the rule holds.
    #[must_use]
    pub fn matches(&self, context: &RuleContext<'_>) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.holds(context))
    }
}

/// Everything the classifier looks at for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyInput<'a> {
    /// Tags of the producing element.
    pub tags: &'a Tags,
    /// Display name of the feature.
    pub name: &'a str,
    /// Resolved zone, if any.
    pub zone: Option<Zone>,
    /// Element that produced the feature, if known.
    pub origin: Option<ElementRef>,
}

/// Normalised view of a [`ClassifyInput`] shared by every rule.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    tags: &'a Tags,
    name: String,
    zone: Option<Zone>,
    origin: Option<ElementRef>,
}

impl<'a> RuleContext<'a> {
    /// Prepare a context, lowercasing the name once.
    #[must_use]
    pub fn new(input: &ClassifyInput<'a>) -> Self {
        Self {
            tags: input.tags,
            name: input.name.to_lowercase(),
            zone: input.zone,
            origin: input.origin,
        }
    }

    fn tag(&self, key: &str) -> Option<String> {
        self.tags.get(key).map(|value| value.to_lowercase())
    }

    fn name_words(&self) -> impl Iterator<Item = &str> {
        self.name
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
    }
}

/// Manual category assignments for known elements, checked before the table.
///
/// # Examples
/// ```
/// use campusmap_core::{Category, CategoryOverrides, ClassifyInput, ElementRef, Tags, Zone, classify};
///
/// let mut overrides = CategoryOverrides::default();
/// overrides.insert(ElementRef::way(42), Category::Stadium);
///
/// let tags = Tags::new();
/// let input = ClassifyInput {
///     tags: &tags,
///     name: "Unnamed Building",
///     zone: Some(Zone::SouthCampus),
///     origin: Some(ElementRef::way(42)),
/// };
/// assert_eq!(classify(&input, &overrides), Category::Stadium);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOverrides {
    by_category: BTreeMap<Category, Vec<ElementRef>>,
}

impl CategoryOverrides {
    /// Assign `category` to `element`, replacing any earlier assignment.
    pub fn insert(&mut self, element: ElementRef, category: Category) {
        for elements in self.by_category.values_mut() {
            elements.retain(|existing| *existing != element);
        }
        self.by_category.entry(category).or_default().push(element);
    }

    /// Whether no overrides are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.values().all(Vec::is_empty)
    }

    /// Category assigned to `element`, if any.
    #[must_use]
    pub fn get(&self, element: ElementRef) -> Option<Category> {
        self.by_category
            .iter()
            .find(|(_, elements)| elements.contains(&element))
            .map(|(category, _)| *category)
    }

    fn rules(&self) -> impl Iterator<Item = (Category, Condition<'_>)> {
        self.by_category
            .iter()
            .map(|(category, elements)| (*category, Condition::ElementIn(elements)))
    }
}

impl FromIterator<(ElementRef, Category)> for CategoryOverrides {
    fn from_iter<I: IntoIterator<Item = (ElementRef, Category)>>(iter: I) -> Self {
        let mut overrides = Self::default();
        for (element, category) in iter {
            overrides.insert(element, category);
        }
        overrides
    }
}

/// Category of the first rule in `rules` that matches.
#[must_use]
pub fn evaluate_rules(rules: &[CategoryRule<'_>], context: &RuleContext<'_>) -> Option<Category> {
    rules
        .iter()
        .find(|rule| rule.matches(context))
        .map(|rule| rule.category)
}

/// Category used when no rule matches.
#[must_use]
pub const fn zone_default(zone: Option<Zone>) -> Category {
    match zone {
        Some(Zone::NorthCampus | Zone::SouthCampus) => Category::AcademicResearch,
        Some(Zone::TheHill) => Category::OnCampusHousing,
        Some(Zone::Westwood) | None => Category::Unknown,
    }
}

/// Classify a feature from its tags, name and zone.
///
/// # Examples
/// ```
/// use campusmap_core::{Category, Tags, Zone, determine_category};
///
/// let tags = Tags::from([("building".into(), "yes".into())]);
/// assert_eq!(
///     determine_category(&tags, "Geffen Playhouse", Some(Zone::NorthCampus)),
///     Category::PerformingArts
/// );
/// assert_eq!(
///     determine_category(&tags, "Math Sciences", Some(Zone::NorthCampus)),
///     Category::AcademicResearch
/// );
/// assert_eq!(determine_category(&tags, "Math Sciences", None), Category::Unknown);
/// ```
#[must_use]
pub fn determine_category(tags: &Tags, name: &str, zone: Option<Zone>) -> Category {
    let input = ClassifyInput {
        tags,
        name,
        zone,
        origin: None,
    };
    classify(&input, &CategoryOverrides::default())
}

/// Classify a feature, honouring manual overrides by element.
#[must_use]
pub fn classify(input: &ClassifyInput<'_>, overrides: &CategoryOverrides) -> Category {
    let context = RuleContext::new(input);
    overrides
        .rules()
        .find(|(_, condition)| condition.holds(&context))
        .map(|(category, _)| category)
        .or_else(|| evaluate_rules(CATEGORY_RULES, &context))
        .unwrap_or_else(|| zone_default(input.zone))
}

/// Whether the name refers to a major landmark outside campus proper.
#[must_use]
pub fn is_important_off_campus(name: &str) -> bool {
    let lowered = name.to_lowercase();
    OFF_CAMPUS_LANDMARKS
        .iter()
        .any(|landmark| lowered.contains(landmark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[fixture]
    fn building() -> Tags {
        tags(&[("building", "yes")])
    }

    #[rstest]
    #[case("Powell Library", Category::Library)]
    #[case("Louise M. Darling Biomedical Library", Category::ClinicHealth)]
    #[case("Ronald Reagan UCLA Medical Center", Category::ClinicHealth)]
    #[case("Fowler Museum", Category::Museum)]
    #[case("Royce Hall", Category::OnCampusHousing)]
    #[case("Geffen Playhouse", Category::PerformingArts)]
    #[case("Rieber Hall", Category::OnCampusHousing)]
    #[case("Covel Commons", Category::FoodService)]
    #[case("Drake Stadium", Category::Stadium)]
    #[case("Los Angeles Tennis Center", Category::SportsCourtPitch)]
    #[case("Spaulding Field", Category::SportsField)]
    #[case("Central Plant", Category::Operations)]
    #[case("Parking Structure 8", Category::ParkingStructure)]
    fn classifies_by_name(building: Tags, #[case] name: &str, #[case] expected: Category) {
        assert_eq!(
            determine_category(&building, name, Some(Zone::SouthCampus)),
            expected
        );
    }

    #[rstest]
    fn housing_in_the_village_is_off_campus(building: Tags) {
        assert_eq!(
            determine_category(&building, "Landfair Apartments", Some(Zone::Westwood)),
            Category::OffCampusHousing
        );
        assert_eq!(
            determine_category(&building, "Landfair Apartments", Some(Zone::TheHill)),
            Category::OnCampusHousing
        );
    }

    #[rstest]
    #[case(&[("amenity", "hospital")], Category::Hospital)]
    #[case(&[("healthcare", "clinic")], Category::ClinicHealth)]
    #[case(&[("amenity", "kindergarten")], Category::LowerEducation)]
    #[case(&[("tourism", "Gallery")], Category::Museum)]
    #[case(&[("leisure", "swimming_pool")], Category::Pool)]
    #[case(&[("leisure", "garden")], Category::GreenSpace)]
    #[case(&[("amenity", "parking")], Category::ParkingLot)]
    #[case(&[("amenity", "parking"), ("building", "parking")], Category::ParkingStructure)]
    fn classifies_by_tag(#[case] pairs: &[(&str, &str)], #[case] expected: Category) {
        assert_eq!(
            determine_category(&tags(pairs), "Unnamed Building", Some(Zone::NorthCampus)),
            expected
        );
    }

    #[rstest]
    fn greek_letters_match_whole_words_only(building: Tags) {
        assert_eq!(
            determine_category(&building, "Sigma Nu", Some(Zone::Westwood)),
            Category::OffCampusHousing
        );
        assert_eq!(
            determine_category(&building, "Alphabet Soup Labs", Some(Zone::NorthCampus)),
            Category::AcademicResearch
        );
    }

    #[rstest]
    #[case(Some(Zone::NorthCampus), Category::AcademicResearch)]
    #[case(Some(Zone::SouthCampus), Category::AcademicResearch)]
    #[case(Some(Zone::TheHill), Category::OnCampusHousing)]
    #[case(Some(Zone::Westwood), Category::Unknown)]
    #[case(None, Category::Unknown)]
    fn unmatched_features_use_the_zone_default(
        #[case] zone: Option<Zone>,
        #[case] expected: Category,
    ) {
        assert_eq!(determine_category(&Tags::new(), "Unnamed Building", zone), expected);
    }

    #[rstest]
    fn first_matching_rule_wins() {
        let context_tags = tags(&[("leisure", "stadium")]);
        let input = ClassifyInput {
            tags: &context_tags,
            name: "Pauley Pool",
            zone: None,
            origin: None,
        };
        let context = RuleContext::new(&input);
        let rules = [
            CategoryRule::new(Category::Pool, &[Condition::NameContains("pool")]),
            CategoryRule::new(
                Category::Stadium,
                &[Condition::TagEquals {
                    key: "leisure",
                    value: "stadium",
                }],
            ),
        ];
        assert_eq!(evaluate_rules(&rules, &context), Some(Category::Pool));
        assert_eq!(evaluate_rules(&rules[1..], &context), Some(Category::Stadium));
    }

    #[rstest]
    fn overrides_precede_the_rule_table(building: Tags) {
        let overrides: CategoryOverrides =
            [(ElementRef::way(7), Category::GreenSpace)].into_iter().collect();
        let input = ClassifyInput {
            tags: &building,
            name: "Powell Library",
            zone: Some(Zone::NorthCampus),
            origin: Some(ElementRef::way(7)),
        };
        assert_eq!(classify(&input, &overrides), Category::GreenSpace);

        let other = ClassifyInput {
            origin: Some(ElementRef::way(8)),
            ..input
        };
        assert_eq!(classify(&other, &overrides), Category::Library);
    }

    #[rstest]
    fn reinserting_an_override_replaces_it() {
        let mut overrides = CategoryOverrides::default();
        overrides.insert(ElementRef::way(1), Category::Pool);
        overrides.insert(ElementRef::way(1), Category::Stadium);
        assert_eq!(overrides.get(ElementRef::way(1)), Some(Category::Stadium));
    }

    #[rstest]
    #[case("Hammer Museum", true)]
    #[case("UCLA Health Westwood Medical Plaza", true)]
    #[case("Powell Library", false)]
    fn detects_off_campus_landmarks(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_important_off_campus(name), expected);
    }
}
