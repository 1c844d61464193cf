//! HTTP response helpers.
//!
//! Centralizes status-code checks (non-success → [`FetchError::Status`],
//! with `Retry-After` parsing for 429 and 503) so the fetcher stays focused
//! on request construction and retry.

use crate::error::FetchError;

/// Return the response unchanged on success, or a [`FetchError::Status`]
/// describing the failure.
pub fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(FetchError::Status {
        status: status.as_u16(),
        url: resp.url().to_string(),
        retry_after_secs: parse_retry_after(&resp),
    })
}

/// Parse the `Retry-After` header as whole seconds. HTTP-date values are
/// ignored.
fn parse_retry_after(resp: &reqwest::Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
