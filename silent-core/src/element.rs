//! Raw map elements as returned by the Overpass geodata service.

use std::collections::HashMap;

use geo::Coord;

/// Free-form OpenStreetMap key/value tags.
pub type Tags = HashMap<String, String>;

/// The three geometry representations used by OpenStreetMap.
///
/// Source identifiers are only unique within one kind, see
/// [`crate::identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ElementKind {
    /// A single point.
    Node,
    /// An ordered list of nodes; carries a computed centroid.
    Way,
    /// A group of members; carries a computed centroid.
    Relation,
}

impl ElementKind {
    /// All kinds in identifier-partition order.
    pub const ALL: [Self; 3] = [Self::Node, Self::Way, Self::Relation];

    /// Return the kind as the lowercase name used on the wire.
    ///
    /// # Examples
    /// ```
    /// use silent_core::ElementKind;
    ///
    /// assert_eq!(ElementKind::Relation.as_str(), "relation");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Centroid computed by the service for ways and relations (`out center`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Center {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// One entry of the service's `elements` array.
///
/// # Examples
/// ```
/// use silent_core::{ElementKind, RawElement};
///
/// let json = r#"{"type":"way","id":42,"center":{"lat":52.09,"lon":5.12},"tags":{"amenity":"library"}}"#;
/// let element: RawElement = serde_json::from_str(json).expect("valid element");
/// assert_eq!(element.kind, ElementKind::Way);
/// let position = element.position().expect("centroid should be used");
/// assert_eq!(position.y, 52.09);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawElement {
    /// Entity kind.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ElementKind,
    /// Source identifier, unique only within [`RawElement::kind`].
    pub id: i64,
    /// Direct latitude, present for nodes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lat: Option<f64>,
    /// Direct longitude, present for nodes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lon: Option<f64>,
    /// Computed centroid, present for ways and relations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub center: Option<Center>,
    /// Element tags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Tags,
}

impl RawElement {
    /// Construct an element without coordinates or tags.
    #[must_use]
    pub fn new(kind: ElementKind, id: i64) -> Self {
        Self {
            kind,
            id,
            lat: None,
            lon: None,
            center: None,
            tags: Tags::new(),
        }
    }

    /// Set the direct coordinate pair.
    #[must_use]
    pub fn with_point(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Set the computed centroid.
    #[must_use]
    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.center = Some(Center { lat, lon });
        self
    }

    /// Add a tag, replacing any previous value for `key`.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Resolve the element's map position.
    ///
    /// The direct pair wins when both halves are present; otherwise the
    /// centroid is used. Returns `None` when neither yields a valid WGS84
    /// coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn position(&self) -> Option<Coord<f64>> {
        let direct = self.lat.zip(self.lon);
        let centroid = self.center.map(|center| (center.lat, center.lon));
        direct
            .or(centroid)
            .and_then(|(lat, lon)| validated_coord(lon, lat))
    }

    /// Look up a tag value, treating blank values as absent.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        non_blank(&self.tags, key)
    }
}

/// Return `Some` when the coordinate is finite and inside WGS84 bounds.
#[must_use]
pub fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    (lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat))
    .then_some(Coord { x: lon, y: lat })
}

pub(crate) fn non_blank<'a>(tags: &'a Tags, key: &str) -> Option<&'a str> {
    tags.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
