//! The canonical row persisted in the store.

use crate::Category;
use crate::element::{Tags, non_blank};

/// Tag holding the display name.
pub const NAME_TAG: &str = "name";
/// Placeholder used when an element has no name.
pub const UNNAMED: &str = "Naamloos";

/// One accepted location.
///
/// `id` is unique across the whole store; see [`crate::identity`].
/// Coordinates are decimal WGS84 degrees.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocationRecord {
    /// Store-wide identifier.
    pub id: i64,
    /// Display name, never empty.
    pub name: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Assigned category.
    pub category: Category,
    /// Display address, never empty.
    pub address: String,
}

/// Return the trimmed `name` tag, or [`UNNAMED`].
///
/// # Examples
/// ```
/// use silent_core::{Tags, UNNAMED, display_name};
///
/// assert_eq!(display_name(&Tags::new()), UNNAMED);
/// ```
#[must_use]
pub fn display_name(tags: &Tags) -> String {
    non_blank(tags, NAME_TAG).unwrap_or(UNNAMED).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("  Domkerk "), "Domkerk")]
    #[case(Some("   "), UNNAMED)]
    #[case(None, UNNAMED)]
    fn derives_display_name(#[case] name: Option<&str>, #[case] expected: &str) {
        let mut tags = Tags::new();
        if let Some(value) = name {
            tags.insert(NAME_TAG.to_owned(), value.to_owned());
        }
        assert_eq!(display_name(&tags), expected);
    }
}
