//! Blocking Overpass client built on `reqwest`.
//!
//! The [`ElementSource`] trait is synchronous so the pipeline stays a plain
//! sequential function. The fetcher bridges the async HTTP call to it by
//! blocking on a Tokio runtime it owns.

use std::time::Duration;

use log::info;
use reqwest::Client;
use reqwest::header::{REFERER, RETRY_AFTER};
use silent_core::RawElement;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::response::interpret_response;
use super::{ElementSource, FetchError, FetcherBuildError, OverpassQuery};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Client signature expected by the public Overpass instances.
pub const DEFAULT_USER_AGENT: &str = "SilentModeAppBuilder/2.0";

/// Referer sent alongside the user agent.
pub const DEFAULT_REFERER: &str = "https://github.com/";

/// Extra client-side time allowed beyond the query's own budget, so a
/// server-side 504 is observed before the client gives up.
pub const TIMEOUT_GRACE: Duration = Duration::from_secs(30);

/// Configuration for [`OverpassFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Interpreter URL.
    pub endpoint: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Referer` header value.
    pub referer: String,
    /// Client-side request timeout.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            referer: DEFAULT_REFERER.to_owned(),
            timeout: Duration::from_secs(u64::from(super::DEFAULT_QUERY_TIMEOUT_SECS))
                .saturating_add(TIMEOUT_GRACE),
        }
    }
}

impl FetchConfig {
    /// Create a configuration for the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Default configuration whose timeout tracks the query's budget.
    #[must_use]
    pub fn for_query(query: &OverpassQuery) -> Self {
        Self::default().with_timeout(
            Duration::from_secs(u64::from(query.timeout_secs)).saturating_add(TIMEOUT_GRACE),
        )
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the referer header.
    #[must_use]
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// Set the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// HTTP [`ElementSource`] posting queries to an Overpass interpreter.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the fetcher blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime (detected via
/// [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]) it uses that
/// runtime's handle with [`tokio::task::block_in_place`] to avoid nested
/// runtime panics. Inside a `current_thread` runtime it falls back to its
/// own runtime.
pub struct OverpassFetcher {
    client: Client,
    config: FetchConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OverpassFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassFetcher")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl OverpassFetcher {
    /// Create a fetcher for `endpoint` with default headers and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetcherBuildError> {
        Self::with_config(FetchConfig::new(endpoint))
    }

    /// Create a fetcher with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: FetchConfig) -> Result<Self, FetcherBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(FetcherBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FetcherBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_async(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, FetchError> {
        let url = self.config.endpoint.as_str();
        let text = query.render();
        info!("Posting Overpass query to {url} ({} bytes)", text.len());

        let response = self
            .client
            .post(url)
            .header(REFERER, &self.config.referer)
            .form(&[("data", text.as_str())])
            .send()
            .await
            .map_err(|err| transport_error(url, &err))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(url, &err))?;

        let elements = interpret_response(url, status, retry_after, &body)?;
        info!("Received {} elements from {url}", elements.len());
        Ok(elements)
    }
}

fn transport_error(url: &str, error: &reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_owned(),
        timed_out: error.is_timeout(),
        message: error.to_string(),
    }
}

impl ElementSource for OverpassFetcher {
    fn fetch_elements(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, FetchError> {
        // block_in_place requires a multi-threaded runtime; for current_thread
        // runtimes we fall back to our own stored runtime.
        let future = self.fetch_async(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}
