use thiserror::Error;

/// Failures raised while fetching elements from the Overpass API.
///
/// Every variant is fatal for the current run; the fetcher never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, connection or client-side timeout failure.
    #[error("transport failure contacting {url}: {message}")]
    Transport {
        /// Endpoint that was contacted.
        url: String,
        /// Whether the client-side timeout elapsed.
        timed_out: bool,
        /// Description of the transport error.
        message: String,
    },
    /// HTTP 429 from the server.
    #[error("rate limited by {url}{}", retry_hint(.retry_after.as_deref()))]
    RateLimited {
        /// Endpoint that was contacted.
        url: String,
        /// Raw `Retry-After` header, when supplied.
        retry_after: Option<String>,
    },
    /// Any other non-2xx status, notably 504 when the query budget ran out.
    #[error("upstream error from {url}: HTTP {status}: {body}")]
    Upstream {
        /// Endpoint that was contacted.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body truncated for diagnostics.
        body: String,
    },
    /// The body was not JSON or lacked an `elements` array.
    #[error("malformed response from {url}: {message}")]
    Protocol {
        /// Endpoint that was contacted.
        url: String,
        /// Description of the decoding failure.
        message: String,
    },
}

fn retry_hint(retry_after: Option<&str>) -> String {
    retry_after.map_or_else(String::new, |value| format!(" (retry after {value})"))
}

/// Error type for [`super::OverpassFetcher`] construction failures.
#[derive(Debug, Error)]
pub enum FetcherBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}
