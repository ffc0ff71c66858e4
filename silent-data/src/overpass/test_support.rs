//! Test utilities for element sources.
//!
//! [`StubElementSource`] returns pre-configured elements or errors without
//! making HTTP requests, and records the queries it was asked to run.

use std::cell::RefCell;

use silent_core::RawElement;

use super::{ElementSource, FetchError, OverpassQuery, OverpassResponse};

/// Stub [`ElementSource`] for tests.
///
/// # Example
///
/// ```
/// use silent_data::overpass::test_support::StubElementSource;
/// use silent_data::overpass::{ElementSource, OverpassQuery};
///
/// let source = StubElementSource::from_json(
///     r#"{"elements":[{"type":"node","id":1,"lat":52.0,"lon":5.0}]}"#,
/// )
/// .expect("valid fixture");
/// let elements = source.fetch_elements(&OverpassQuery::netherlands()).expect("stubbed");
/// assert_eq!(elements.len(), 1);
/// assert_eq!(source.queries().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StubElementSource {
    response: Result<Vec<RawElement>, FetchError>,
    queries: RefCell<Vec<String>>,
}

impl StubElementSource {
    /// Create a source that returns the given elements.
    #[must_use]
    pub fn with_elements(elements: Vec<RawElement>) -> Self {
        Self {
            response: Ok(elements),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Create a source that fails with the given error.
    #[must_use]
    pub fn with_error(error: FetchError) -> Self {
        Self {
            response: Err(error),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Create a source from an Overpass JSON document.
    ///
    /// # Errors
    /// Returns the decoding error when `json` is not a valid response.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let response: OverpassResponse = serde_json::from_str(json)?;
        Ok(Self::with_elements(response.elements))
    }

    /// Rendered queries received so far.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

impl ElementSource for StubElementSource {
    fn fetch_elements(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, FetchError> {
        self.queries.borrow_mut().push(query.render());
        self.response.clone()
    }
}
