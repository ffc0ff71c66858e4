//! Property-based tests for the domain rules.
//!
//! # Invariants tested
//!
//! - **Idempotent classification:** the same tags always yield the same category.
//! - **Unique identifiers:** equal source ids of different kinds never collide.
//! - **Exclusion law:** names containing "kapel" in any case are excluded.
//! - **Non-empty addresses:** address synthesis never returns an empty string.

use std::collections::HashSet;

use proptest::prelude::*;
use silent_core::{
    CITY_TAG, Category, Classifier, ElementKind, HOUSE_NUMBER_TAG, NameFilter, PARTITION_WIDTH,
    STREET_TAG, Tags, derive_location_id, synthesise_address,
};

const KEYS: [&str; 6] = ["amenity", "tourism", "landuse", "office", "healthcare", "shop"];
const VALUES: [&str; 12] = [
    "theatre",
    "cinema",
    "library",
    "museum",
    "community_centre",
    "hospital",
    "cemetery",
    "grave_yard",
    "townhall",
    "government",
    "place_of_worship",
    "bakery",
];

fn tags_strategy() -> impl Strategy<Value = Tags> {
    proptest::collection::hash_map(
        proptest::sample::select(KEYS.to_vec()).prop_map(str::to_owned),
        proptest::sample::select(VALUES.to_vec()).prop_map(str::to_owned),
        0..4,
    )
}

fn optional_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ a-zA-Z0-9]{0,12}")
}

/// Randomise the case of every character in `term`.
fn recase(term: &str, mask: u64) -> String {
    term.chars()
        .enumerate()
        .map(|(idx, ch)| {
            if (mask >> (idx % 64)) & 1 == 1 {
                ch.to_ascii_uppercase()
            } else {
                ch
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn classification_is_idempotent(tags in tags_strategy()) {
        let classifier = Classifier::standard();
        let first = classifier.classify(&tags);
        prop_assert_eq!(first, classifier.classify(&tags));
        prop_assert!(Category::ALL.contains(&first));
    }

    #[test]
    fn identifiers_are_unique_across_kinds(raw in 0_i64..PARTITION_WIDTH) {
        let ids: HashSet<i64> = ElementKind::ALL
            .into_iter()
            .map(|kind| derive_location_id(kind, raw).expect("within partition"))
            .collect();
        prop_assert_eq!(ids.len(), 3);
    }

    #[test]
    fn names_containing_kapel_are_excluded(
        prefix in "[a-z ]{0,8}",
        suffix in "[a-z ]{0,8}",
        mask in any::<u64>(),
    ) {
        let name = format!("{prefix}{}{suffix}", recase("kapel", mask));
        prop_assert!(NameFilter::default().is_excluded(&name));
    }

    #[test]
    fn synthesised_addresses_are_never_empty(
        street in optional_text(),
        number in optional_text(),
        city in optional_text(),
    ) {
        let mut tags = Tags::new();
        for (key, value) in [(STREET_TAG, street), (HOUSE_NUMBER_TAG, number), (CITY_TAG, city)] {
            if let Some(text) = value {
                tags.insert(key.to_owned(), text);
            }
        }
        let address = synthesise_address(&tags);
        prop_assert!(!address.trim().is_empty());
    }
}
