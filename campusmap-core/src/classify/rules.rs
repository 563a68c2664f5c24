//! The canonical category rule table.
//!
//! Order is part of the contract: health and schooling first, then housing,
//! dining, and the named venues. Housing hints include "hall", so a venue
//! named "... Hall" is housing unless tagged otherwise or overridden.
//! Parking structures are tested before surface lots.

use super::{Category, CategoryRule, Condition};
use crate::zone::Zone;

const POOL_HINTS: &[&str] = &["pool", "aquatic"];
const STADIUM_HINTS: &[&str] = &["stadium", "pavilion"];
const COURT_HINTS: &[&str] = &["court", "tennis"];
const FIELD_HINTS: &[&str] = &["track", "field", "intramural", "im field", "drake", "spaulding"];

const DINING_HINTS: &[&str] = &[
    "rendezvous",
    "feast",
    "covel",
    "de neve",
    "deneve",
    "epicuria",
    "bruins",
    "b-plate",
    "bruin plate",
    "bruincafe",
    "bruincafé",
    "hederick",
    "sproul commons",
    "ckc",
    "the study",
    "the den",
    "cafe",
    "café",
    "restaurant",
    "food court",
    "hilltop shop",
    "hill top shop",
];

const HOUSING_HINTS: &[&str] = &[
    "residence",
    "res hall",
    "hall",
    "apartments",
    "apartment",
    "plaza",
    "rieber",
    "hedrick",
    "sproul",
    "de neve",
    "sunset village",
    "acacia",
    "gardenia",
    "holly",
    "dykstra",
    "delta terrace",
    "dogwood",
    "saxon",
    "wyton",
    "gayley court",
    "gayley heights",
    "fraternity",
    "sorority",
];

const GREEK_WORDS: &[&str] = &[
    "fraternity",
    "sorority",
    "alpha",
    "beta",
    "gamma",
    "delta",
    "epsilon",
    "zeta",
    "eta",
    "theta",
    "iota",
    "kappa",
    "lambda",
    "mu",
    "nu",
    "xi",
    "omicron",
    "pi",
    "rho",
    "sigma",
    "tau",
    "upsilon",
    "phi",
    "chi",
    "psi",
    "omega",
];

const LIBRARY_MUSEUM_HINTS: &[&str] = &[
    "library",
    "powell",
    "yrl",
    "young research library",
    "biomedical library",
    "fowler museum",
    "hammer museum",
    "hammer",
];

const PERFORMANCE_HINTS: &[&str] = &[
    "royce hall",
    "geffen playhouse",
    "schoenberg",
    "capitol steps",
    "freud",
    "gindi",
    "theatre",
    "theater",
    "konkoff",
];

const MEDICAL_HINTS: &[&str] = &[
    "medical",
    "health",
    "hospital",
    "clinic",
    "chs",
    "ronald reagan ucla",
    "ucla health",
    "dental",
    "rehabilitation",
    "neuroscience",
];

const SERVICE_HINTS: &[&str] = &[
    "utility",
    "plant",
    "power",
    "central plant",
    "mail",
    "loading",
    "warehouse",
    "service",
    "maintenance",
];

/// Lowercase name fragments of major landmarks just outside campus.
pub const OFF_CAMPUS_LANDMARKS: &[&str] = &[
    "hammer museum",
    "geffen playhouse",
    "ronald reagan ucla medical center",
    "ucla health westwood",
    "marina aquatics center",
];

const IS_LIBRARY: Condition<'static> = Condition::AnyOf(&[
    Condition::TagEquals {
        key: "amenity",
        value: "library",
    },
    Condition::NameContains("library"),
]);

const IS_HOUSING: Condition<'static> = Condition::AnyOf(&[
    Condition::TagIn {
        key: "building",
        values: &["residential", "dormitory", "apartments", "fraternity", "sorority"],
    },
    Condition::TagIn {
        key: "amenity",
        values: &["fraternity", "sorority"],
    },
    Condition::NameHasWord(GREEK_WORDS),
    Condition::NameContainsAny(HOUSING_HINTS),
]);

const IS_PARKING: Condition<'static> = Condition::AnyOf(&[
    Condition::TagEquals {
        key: "amenity",
        value: "parking",
    },
    Condition::TagIn {
        key: "parking",
        values: &["multi-storey", "underground"],
    },
    Condition::TagContains {
        key: "building",
        needle: "parking",
    },
    Condition::TagContains {
        key: "operator",
        needle: "parking",
    },
    Condition::NameContains("parking"),
]);

/// Category rules in evaluation order.
pub static CATEGORY_RULES: &[CategoryRule<'static>] = &[
    CategoryRule::new(
        Category::Hospital,
        &[Condition::AnyOf(&[
            Condition::TagContains {
                key: "amenity",
                needle: "hospital",
            },
            Condition::NameContains("hospital"),
        ])],
    ),
    CategoryRule::new(
        Category::ClinicHealth,
        &[Condition::AnyOf(&[
            Condition::TagPresent { key: "healthcare" },
            Condition::TagIn {
                key: "amenity",
                values: &["clinic", "doctors", "dentist", "hospital"],
            },
            Condition::NameContainsAny(MEDICAL_HINTS),
        ])],
    ),
    CategoryRule::new(
        Category::LowerEducation,
        &[Condition::AnyOf(&[
            Condition::TagIn {
                key: "amenity",
                values: &["school", "kindergarten"],
            },
            Condition::TagIn {
                key: "building",
                values: &["school", "kindergarten"],
            },
        ])],
    ),
    CategoryRule::new(
        Category::OffCampusHousing,
        &[Condition::ZoneIs(Zone::Westwood), IS_HOUSING],
    ),
    CategoryRule::new(Category::OnCampusHousing, &[IS_HOUSING]),
    CategoryRule::new(
        Category::FoodService,
        &[Condition::AnyOf(&[
            Condition::TagIn {
                key: "amenity",
                values: &["restaurant", "fast_food", "cafe", "café", "food_court"],
            },
            Condition::TagIn {
                key: "shop",
                values: &["convenience", "supermarket"],
            },
            Condition::NameContainsAny(DINING_HINTS),
        ])],
    ),
    CategoryRule::new(Category::Library, &[IS_LIBRARY]),
    CategoryRule::new(
        Category::Museum,
        &[Condition::AnyOf(&[
            Condition::TagIn {
                key: "tourism",
                values: &["museum", "gallery"],
            },
            Condition::AllOf(&[
                Condition::NameContainsAny(LIBRARY_MUSEUM_HINTS),
                Condition::Not(&IS_LIBRARY),
            ]),
        ])],
    ),
    CategoryRule::new(
        Category::PerformingArts,
        &[Condition::AnyOf(&[
            Condition::NameContainsAny(PERFORMANCE_HINTS),
            Condition::TagIn {
                key: "amenity",
                values: &["theatre", "arts_centre", "concert_hall"],
            },
        ])],
    ),
    CategoryRule::new(
        Category::Pool,
        &[Condition::AnyOf(&[
            Condition::TagEquals {
                key: "leisure",
                value: "swimming_pool",
            },
            Condition::NameContainsAny(POOL_HINTS),
        ])],
    ),
    CategoryRule::new(
        Category::Stadium,
        &[Condition::AnyOf(&[
            Condition::TagEquals {
                key: "leisure",
                value: "stadium",
            },
            Condition::NameContainsAny(STADIUM_HINTS),
        ])],
    ),
    CategoryRule::new(
        Category::SportsCourtPitch,
        &[Condition::AnyOf(&[
            Condition::TagEquals {
                key: "leisure",
                value: "tennis_court",
            },
            Condition::NameContainsAny(COURT_HINTS),
        ])],
    ),
    CategoryRule::new(
        Category::SportsField,
        &[Condition::AnyOf(&[
            Condition::TagIn {
                key: "leisure",
                values: &["pitch", "track", "sports_centre"],
            },
            Condition::NameContainsAny(FIELD_HINTS),
        ])],
    ),
    CategoryRule::new(
        Category::GreenSpace,
        &[Condition::AnyOf(&[
            Condition::TagIn {
                key: "leisure",
                values: &["park", "garden"],
            },
            Condition::TagIn {
                key: "landuse",
                values: &["grass", "recreation_ground", "forest", "meadow", "shrubland"],
            },
            Condition::TagIn {
                key: "natural",
                values: &["scrub", "shrub", "shrubland", "wood", "grassland"],
            },
        ])],
    ),
    CategoryRule::new(
        Category::ParkingStructure,
        &[
            IS_PARKING,
            Condition::AnyOf(&[
                Condition::NameContains("structure"),
                Condition::TagEquals {
                    key: "building",
                    value: "parking",
                },
            ]),
        ],
    ),
    CategoryRule::new(Category::ParkingLot, &[IS_PARKING]),
    CategoryRule::new(
        Category::Operations,
        &[Condition::NameContainsAny(SERVICE_HINTS)],
    ),
];
