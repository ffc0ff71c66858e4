//! Overpass API response decoding and status classification.

use log::warn;
use serde::Deserialize;
use silent_core::RawElement;

use super::FetchError;

/// Maximum number of characters of a failing body kept for diagnostics.
pub const BODY_SNIPPET_CHARS: usize = 200;

/// JSON document returned by the interpreter endpoint.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements.
    pub elements: Vec<RawElement>,
    /// Server remark, set when the query partially failed (for example on
    /// a runtime error after output had started).
    #[serde(default)]
    pub remark: Option<String>,
}

/// Classify an HTTP outcome into elements or a [`FetchError`].
///
/// - 2xx: the body must decode to [`OverpassResponse`].
/// - 429: [`FetchError::RateLimited`].
/// - anything else: [`FetchError::Upstream`] with a truncated body.
///
/// # Examples
/// ```
/// use silent_data::overpass::{FetchError, interpret_response};
///
/// let elements = interpret_response("http://localhost", 200, None, r#"{"elements":[]}"#)
///     .expect("empty element list is valid");
/// assert!(elements.is_empty());
///
/// let err = interpret_response("http://localhost", 504, None, "timeout").expect_err("504");
/// assert!(matches!(err, FetchError::Upstream { status: 504, .. }));
/// ```
pub fn interpret_response(
    url: &str,
    status: u16,
    retry_after: Option<String>,
    body: &str,
) -> Result<Vec<RawElement>, FetchError> {
    match status {
        200..=299 => decode_elements(url, body),
        429 => Err(FetchError::RateLimited {
            url: url.to_owned(),
            retry_after,
        }),
        _ => Err(FetchError::Upstream {
            url: url.to_owned(),
            status,
            body: truncate_body(body),
        }),
    }
}

fn decode_elements(url: &str, body: &str) -> Result<Vec<RawElement>, FetchError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Protocol {
            url: url.to_owned(),
            message: err.to_string(),
        })?;
    if let Some(remark) = &response.remark {
        warn!("Overpass remark from {url}: {remark}");
    }
    Ok(response.elements)
}

/// Keep at most [`BODY_SNIPPET_CHARS`] characters, cutting on a character boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", trimmed.get(..cut).unwrap_or(trimmed)),
        None => trimmed.to_owned(),
    }
}
