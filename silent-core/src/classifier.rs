//! Ordered tag-to-category rule table.
//!
//! Tag sets may satisfy several rules at once, for example a cemetery that
//! also carries `amenity=place_of_worship`. Rules are evaluated in order and
//! the first match wins: cultural and entertainment tags come first, civic
//! tags next, and worship last. Anything unmatched falls back to
//! [`Category::Church`], which the consuming app expects as its default.

use crate::element::{Tags, non_blank};
use crate::Category;

/// Matches when `key` carries one of `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch {
    /// Tag key, such as `amenity`.
    pub key: &'static str,
    /// Accepted values for the key.
    pub values: &'static [&'static str],
}

impl TagMatch {
    /// Construct a matcher.
    #[must_use]
    pub const fn new(key: &'static str, values: &'static [&'static str]) -> Self {
        Self { key, values }
    }

    /// Report whether `tags` satisfy this matcher.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        non_blank(tags, self.key).is_some_and(|value| self.values.contains(&value))
    }
}

/// A category guarded by one or more alternative tag matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Category assigned when any matcher succeeds.
    pub category: Category,
    /// Alternative matchers; one success is enough.
    pub matches: &'static [TagMatch],
}

impl ClassificationRule {
    /// Construct a rule.
    #[must_use]
    pub const fn new(category: Category, matches: &'static [TagMatch]) -> Self {
        Self { category, matches }
    }

    /// Report whether any matcher accepts `tags`.
    #[must_use]
    pub fn applies_to(&self, tags: &Tags) -> bool {
        self.matches.iter().any(|matcher| matcher.matches(tags))
    }
}

const STANDARD_RULES: &[ClassificationRule] = &[
    ClassificationRule::new(Category::Theater, &[TagMatch::new("amenity", &["theatre"])]),
    ClassificationRule::new(Category::Cinema, &[TagMatch::new("amenity", &["cinema"])]),
    ClassificationRule::new(Category::Library, &[TagMatch::new("amenity", &["library"])]),
    ClassificationRule::new(
        Category::Museum,
        &[
            TagMatch::new("tourism", &["museum"]),
            TagMatch::new("amenity", &["museum"]),
        ],
    ),
    ClassificationRule::new(
        Category::Community,
        &[TagMatch::new("amenity", &["community_centre"])],
    ),
    ClassificationRule::new(
        Category::Hospital,
        &[
            TagMatch::new("amenity", &["hospital"]),
            TagMatch::new("healthcare", &["hospital"]),
        ],
    ),
    ClassificationRule::new(
        Category::Cemetery,
        &[
            TagMatch::new("landuse", &["cemetery"]),
            TagMatch::new("amenity", &["grave_yard"]),
        ],
    ),
    ClassificationRule::new(
        Category::Government,
        &[
            TagMatch::new("amenity", &["townhall"]),
            TagMatch::new("office", &["government"]),
        ],
    ),
    ClassificationRule::new(
        Category::Church,
        &[TagMatch::new("amenity", &["place_of_worship"])],
    ),
];

const LEGACY_RULES: &[ClassificationRule] = &[
    ClassificationRule::new(Category::Theater, &[TagMatch::new("amenity", &["theatre"])]),
    ClassificationRule::new(Category::Cinema, &[TagMatch::new("amenity", &["cinema"])]),
    ClassificationRule::new(Category::Library, &[TagMatch::new("amenity", &["library"])]),
    ClassificationRule::new(
        Category::Church,
        &[TagMatch::new("amenity", &["place_of_worship"])],
    ),
];

/// First-match-wins classifier over an ordered rule list.
///
/// # Examples
/// ```
/// use silent_core::{Category, Classifier, Tags};
///
/// let classifier = Classifier::standard();
/// let tags = Tags::from([
///     ("landuse".to_owned(), "cemetery".to_owned()),
///     ("amenity".to_owned(), "place_of_worship".to_owned()),
/// ]);
/// assert_eq!(classifier.classify(&tags), Category::Cemetery);
/// assert_eq!(classifier.classify(&Tags::new()), Category::Church);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
    fallback: Category,
}

impl Classifier {
    /// Build a classifier from explicit rules and a fallback category.
    #[must_use]
    pub const fn new(rules: Vec<ClassificationRule>, fallback: Category) -> Self {
        Self { rules, fallback }
    }

    /// The full nine-category taxonomy.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(STANDARD_RULES.to_vec(), Category::Church)
    }

    /// The four-category taxonomy read by older app releases.
    #[must_use]
    pub fn legacy() -> Self {
        Self::new(LEGACY_RULES.to_vec(), Category::Church)
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Category used when no rule matches.
    #[must_use]
    pub const fn fallback(&self) -> Category {
        self.fallback
    }

    /// Return the category of the first matching rule, or the fallback.
    #[must_use]
    pub fn classify(&self, tags: &Tags) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(tags))
            .map_or(self.fallback, |rule| rule.category)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn classifier() -> Classifier {
        Classifier::standard()
    }

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    #[case(&[("amenity", "theatre")], Category::Theater)]
    #[case(&[("amenity", "cinema")], Category::Cinema)]
    #[case(&[("amenity", "library")], Category::Library)]
    #[case(&[("tourism", "museum")], Category::Museum)]
    #[case(&[("amenity", "community_centre")], Category::Community)]
    #[case(&[("healthcare", "hospital")], Category::Hospital)]
    #[case(&[("amenity", "grave_yard")], Category::Cemetery)]
    #[case(&[("office", "government")], Category::Government)]
    #[case(&[("amenity", "place_of_worship")], Category::Church)]
    fn classifies_each_category(
        classifier: Classifier,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: Category,
    ) {
        assert_eq!(classifier.classify(&tags(pairs)), expected);
    }

    #[rstest]
    #[case(&[("landuse", "cemetery"), ("amenity", "place_of_worship")], Category::Cemetery)]
    #[case(&[("tourism", "museum"), ("amenity", "place_of_worship")], Category::Museum)]
    #[case(&[("amenity", "cinema"), ("office", "government")], Category::Cinema)]
    fn earlier_rules_win(
        classifier: Classifier,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: Category,
    ) {
        assert_eq!(classifier.classify(&tags(pairs)), expected);
    }

    #[rstest]
    fn unmatched_tags_fall_back_to_church(classifier: Classifier) {
        assert_eq!(
            classifier.classify(&tags(&[("shop", "bakery")])),
            Category::Church
        );
    }

    #[rstest]
    fn legacy_taxonomy_ignores_newer_categories() {
        let legacy = Classifier::legacy();
        assert_eq!(legacy.rules().len(), 4);
        assert_eq!(
            legacy.classify(&tags(&[("tourism", "museum")])),
            Category::Church
        );
        assert_eq!(
            legacy.classify(&tags(&[("amenity", "theatre")])),
            Category::Theater
        );
    }

    #[rstest]
    fn custom_fallback_is_honoured() {
        let classifier = Classifier::new(Vec::new(), Category::Community);
        assert_eq!(classifier.classify(&Tags::new()), Category::Community);
        assert_eq!(classifier.fallback(), Category::Community);
    }
}
