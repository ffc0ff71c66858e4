//! Name-based denylist applied after classification.
//!
//! The upstream query already filters chapel-like sub-tags; this is a second,
//! purely lexical pass over the display name. Other tags are never inspected.

/// Substrings excluded by default.
pub const DEFAULT_DENYLIST: [&str; 2] = ["kapel", "chapel"];

/// Case-insensitive substring denylist for display names.
///
/// # Examples
/// ```
/// use silent_core::NameFilter;
///
/// let filter = NameFilter::default();
/// assert!(filter.is_excluded("De Kapel"));
/// assert!(filter.is_excluded("St. Mary's CHAPEL"));
/// assert!(!filter.is_excluded("Domkerk"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    terms: Vec<String>,
}

impl NameFilter {
    /// Build a filter from arbitrary terms; blank terms are discarded.
    #[must_use]
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        Self { terms }
    }

    /// A filter that excludes nothing.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self { terms: Vec::new() }
    }

    /// Lowercased terms in configuration order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Return the first term contained in `name`, if any.
    #[must_use]
    pub fn matching_term(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        self.terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Report whether `name` contains any denylisted term.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.matching_term(name).is_some()
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}
