//! Fetch error types.

use thiserror::Error;

/// Errors that can occur while fetching a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport error (connect, timeout, redirect limit, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    Status {
        status: u16,
        url: String,
        /// Seconds from a `Retry-After` header, if the server sent one.
        retry_after_secs: Option<u64>,
    },

    /// The URL could not be parsed or is not `http(s)`.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Every attempt failed with a transient error.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt may succeed: timeouts, connection failures,
    /// interrupted bodies, HTTP 5xx, and HTTP 429.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_body(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidUrl { .. } | Self::Exhausted { .. } => false,
        }
    }

    /// HTTP status of the failing response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Exhausted { last, .. } => last.status(),
            Self::InvalidUrl { .. } => None,
        }
    }
}
