//! The closed set of categories understood by the consuming app.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Application-facing classification of a location.
///
/// The string forms are stored verbatim in the `category` column and must
/// stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Category {
    /// Places of worship; also the fallback category.
    Church,
    /// Theatres.
    Theater,
    /// Cinemas.
    Cinema,
    /// Public libraries.
    Library,
    /// Museums.
    Museum,
    /// Community centres.
    Community,
    /// Hospitals and clinics.
    Hospital,
    /// Cemeteries and grave yards.
    Cemetery,
    /// Town halls and government offices.
    Government,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Church,
        Self::Theater,
        Self::Cinema,
        Self::Library,
        Self::Museum,
        Self::Community,
        Self::Hospital,
        Self::Cemetery,
        Self::Government,
    ];

    /// Return the stored string form.
    ///
    /// # Examples
    /// ```
    /// use silent_core::Category;
    ///
    /// assert_eq!(Category::Theater.as_str(), "theater");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Church => "church",
            Self::Theater => "theater",
            Self::Cinema => "cinema",
            Self::Library => "library",
            Self::Museum => "museum",
            Self::Community => "community",
            Self::Hospital => "hospital",
            Self::Cemetery => "cemetery",
            Self::Government => "government",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| CategoryParseError(s.to_owned()))
    }
}
