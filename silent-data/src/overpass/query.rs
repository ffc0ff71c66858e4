//! Overpass QL query construction.

use std::fmt::{self, Write as _};

use geo::Rect;
use silent_core::ElementKind;

/// Server-side time budget, in seconds, used by the default query.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 180;
/// Area searched by the nationwide queries.
pub const DEFAULT_AREA_NAME: &str = "Nederland";
/// Administrative level of [`DEFAULT_AREA_NAME`].
pub const DEFAULT_ADMIN_LEVEL: u8 = 2;

/// Geographic scope of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryScope {
    /// A named administrative area resolved by the server.
    Area {
        /// Value of the area's `name` tag, such as `Nederland`.
        name: String,
        /// Value of the area's `admin_level` tag.
        admin_level: u8,
    },
    /// An explicit WGS84 bounding box (`x = longitude`, `y = latitude`).
    BoundingBox(Rect<f64>),
}

/// One `key=value` predicate applied to a set of element kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    /// Kinds queried; all three render as a single `nwr` statement.
    pub kinds: Vec<ElementKind>,
    /// Tag key.
    pub key: String,
    /// Required tag value.
    pub value: String,
    /// `key != value` pairs pushed upstream to drop unwanted sub-variants.
    pub exclusions: Vec<(String, String)>,
}

impl TagFilter {
    /// Match `key=value` on nodes, ways and relations.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kinds: ElementKind::ALL.to_vec(),
            key: key.into(),
            value: value.into(),
            exclusions: Vec::new(),
        }
    }

    /// Restrict the filter to the given kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ElementKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    /// Exclude elements where `key` equals `value`.
    #[must_use]
    pub fn excluding(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.exclusions.push((key.into(), value.into()));
        self
    }

    fn write_statements(&self, out: &mut impl fmt::Write, suffix: &str) -> fmt::Result {
        let covers_all = ElementKind::ALL.iter().all(|kind| self.kinds.contains(kind));
        let selectors: Vec<&str> = if covers_all {
            vec!["nwr"]
        } else {
            self.kinds.iter().map(|kind| kind.as_str()).collect()
        };
        for selector in selectors {
            write!(
                out,
                "  {selector}[\"{}\"=\"{}\"]",
                escape(&self.key),
                escape(&self.value)
            )?;
            for (key, value) in &self.exclusions {
                write!(out, "[\"{}\"!=\"{}\"]", escape(key), escape(value))?;
            }
            writeln!(out, "{suffix};")?;
        }
        Ok(())
    }
}

/// Description of an Overpass QL query.
///
/// The rendered text always requests JSON output and ends with
/// `out center;` so ways and relations carry a centroid.
///
/// # Examples
/// ```
/// use silent_data::overpass::{OverpassQuery, QueryScope, TagFilter};
///
/// let query = OverpassQuery::new(QueryScope::Area {
///     name: "Utrecht".into(),
///     admin_level: 4,
/// })
/// .with_filter(TagFilter::new("amenity", "library"));
///
/// let text = query.render();
/// assert!(text.starts_with("[out:json][timeout:180];"));
/// assert!(text.contains("nwr[\"amenity\"=\"library\"](area.searchArea);"));
/// assert!(text.ends_with("out center;\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassQuery {
    /// Server-side time budget in seconds.
    pub timeout_secs: u32,
    /// Optional server-side memory budget in bytes.
    pub max_size: Option<u64>,
    /// Geographic scope.
    pub scope: QueryScope,
    /// Predicates combined as a union.
    pub filters: Vec<TagFilter>,
}

impl OverpassQuery {
    /// Create a query with the default budget and no predicates.
    #[must_use]
    pub fn new(scope: QueryScope) -> Self {
        Self {
            timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            max_size: None,
            scope,
            filters: Vec::new(),
        }
    }

    /// The nationwide query for the Netherlands covering every category.
    #[must_use]
    pub fn netherlands() -> Self {
        Self::new(QueryScope::Area {
            name: DEFAULT_AREA_NAME.to_owned(),
            admin_level: DEFAULT_ADMIN_LEVEL,
        })
        .with_filters(default_filters())
    }

    /// The nationwide query restricted to the four legacy categories.
    #[must_use]
    pub fn netherlands_legacy() -> Self {
        Self::new(QueryScope::Area {
            name: DEFAULT_AREA_NAME.to_owned(),
            admin_level: DEFAULT_ADMIN_LEVEL,
        })
        .with_filters(default_filters().into_iter().take(LEGACY_FILTER_COUNT))
    }

    /// Replace the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: QueryScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the server-side time budget.
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the server-side memory budget.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Append a predicate.
    #[must_use]
    pub fn with_filter(mut self, filter: TagFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append several predicates.
    #[must_use]
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = TagFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Render the Overpass QL text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Default for OverpassQuery {
    fn default() -> Self {
        Self::netherlands()
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[out:json][timeout:{}]", self.timeout_secs)?;
        if let Some(max_size) = self.max_size {
            write!(f, "[maxsize:{max_size}]")?;
        }
        let suffix = match &self.scope {
            QueryScope::Area { name, admin_level } => {
                writeln!(f, ";")?;
                writeln!(
                    f,
                    "area[\"name\"=\"{}\"][\"admin_level\"=\"{admin_level}\"]->.searchArea;",
                    escape(name)
                )?;
                "(area.searchArea)"
            }
            QueryScope::BoundingBox(rect) => {
                let (min, max) = (rect.min(), rect.max());
                writeln!(f, "[bbox:{},{},{},{}];", min.y, min.x, max.y, max.x)?;
                ""
            }
        };
        writeln!(f, "(")?;
        for filter in &self.filters {
            filter.write_statements(f, suffix)?;
        }
        writeln!(f, ");")?;
        writeln!(f, "out center;")
    }
}

// The first entries of `default_filters` cover the legacy taxonomy.
const LEGACY_FILTER_COUNT: usize = 4;

fn default_filters() -> Vec<TagFilter> {
    vec![
        TagFilter::new("amenity", "place_of_worship")
            .excluding("building", "chapel")
            .excluding("place_of_worship", "chapel"),
        TagFilter::new("amenity", "theatre"),
        TagFilter::new("amenity", "cinema"),
        TagFilter::new("amenity", "library"),
        TagFilter::new("tourism", "museum"),
        TagFilter::new("amenity", "community_centre"),
        TagFilter::new("amenity", "hospital"),
        TagFilter::new("landuse", "cemetery"),
        TagFilter::new("amenity", "grave_yard"),
        TagFilter::new("amenity", "townhall"),
        TagFilter::new("office", "government"),
    ]
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    fn renders_default_netherlands_query() {
        let text = OverpassQuery::netherlands().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"[out:json][timeout:180];"));
        assert_eq!(
            lines.get(1),
            Some(&"area[\"name\"=\"Nederland\"][\"admin_level\"=\"2\"]->.searchArea;")
        );
        assert!(text.contains(
            "  nwr[\"amenity\"=\"place_of_worship\"][\"building\"!=\"chapel\"][\"place_of_worship\"!=\"chapel\"](area.searchArea);"
        ));
        assert!(text.contains("  nwr[\"amenity\"=\"theatre\"](area.searchArea);"));
        assert_eq!(lines.last(), Some(&"out center;"));
    }

    #[rstest]
    fn legacy_query_only_covers_legacy_categories() {
        let query = OverpassQuery::netherlands_legacy();
        let values: Vec<&str> = query
            .filters
            .iter()
            .map(|filter| filter.value.as_str())
            .collect();
        assert_eq!(values, ["place_of_worship", "theatre", "cinema", "library"]);
        assert!(!query.render().contains("museum"));
    }

    #[rstest]
    fn renders_bounding_box_as_global_setting() {
        let rect = Rect::new(Coord { x: 5.0, y: 52.0 }, Coord { x: 5.2, y: 52.1 });
        let text = OverpassQuery::new(QueryScope::BoundingBox(rect))
            .with_filter(TagFilter::new("amenity", "cinema"))
            .render();
        assert!(text.starts_with("[out:json][timeout:180][bbox:52,5,52.1,5.2];\n"));
        assert!(text.contains("  nwr[\"amenity\"=\"cinema\"];\n"));
        assert!(!text.contains("searchArea"));
    }

    #[rstest]
    fn renders_per_kind_statements_when_kinds_are_partial() {
        let text = OverpassQuery::new(QueryScope::Area {
            name: "Utrecht".into(),
            admin_level: 4,
        })
        .with_filter(
            TagFilter::new("landuse", "cemetery").with_kinds([ElementKind::Way, ElementKind::Relation]),
        )
        .render();
        assert!(text.contains("  way[\"landuse\"=\"cemetery\"](area.searchArea);\n"));
        assert!(text.contains("  relation[\"landuse\"=\"cemetery\"](area.searchArea);\n"));
        assert!(!text.contains("nwr"));
    }

    #[rstest]
    fn renders_budget_directives() {
        let text = OverpassQuery::netherlands()
            .with_timeout_secs(60)
            .with_max_size(536_870_912)
            .render();
        assert!(text.starts_with("[out:json][timeout:60][maxsize:536870912];"));
    }

    #[rstest]
    fn escapes_quotes_in_values() {
        let text = OverpassQuery::new(QueryScope::Area {
            name: "Den \"Bosch\"".into(),
            admin_level: 8,
        })
        .render();
        assert!(text.contains("area[\"name\"=\"Den \\\"Bosch\\\"\"]"));
    }
}
