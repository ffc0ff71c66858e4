//! Overpass API access.
//!
//! [`OverpassQuery`] renders the query text, [`OverpassFetcher`] posts it as
//! the `data` form field and classifies the outcome into [`FetchError`].
//! Callers depend on the [`ElementSource`] trait so the pipeline can run
//! against fixtures through [`test_support::StubElementSource`].
//!
//! # Example
//!
//! ```no_run
//! use silent_data::overpass::{ElementSource, FetchConfig, OverpassFetcher, OverpassQuery};
//!
//! let query = OverpassQuery::netherlands();
//! let fetcher = OverpassFetcher::with_config(FetchConfig::for_query(&query))?;
//! let elements = fetcher.fetch_elements(&query)?;
//! println!("fetched {} elements", elements.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod fetcher;
mod query;
mod response;
#[doc(hidden)]
pub mod test_support;

use silent_core::RawElement;

pub use error::{FetchError, FetcherBuildError};
pub use fetcher::{
    DEFAULT_ENDPOINT, DEFAULT_REFERER, DEFAULT_USER_AGENT, FetchConfig, OverpassFetcher,
    TIMEOUT_GRACE,
};
pub use query::{
    DEFAULT_ADMIN_LEVEL, DEFAULT_AREA_NAME, DEFAULT_QUERY_TIMEOUT_SECS, OverpassQuery, QueryScope,
    TagFilter,
};
pub use response::{BODY_SNIPPET_CHARS, OverpassResponse, interpret_response};

/// Source of raw map elements for one query.
pub trait ElementSource {
    /// Run `query` and return the raw `elements` array.
    ///
    /// # Errors
    /// Returns [`FetchError`] when the request or its response fails. No
    /// retries are attempted.
    fn fetch_elements(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, FetchError>;
}
