//! # snap-fetch
//!
//! Document fetching for docsnaps.
//!
//! [`DocumentSource`] is the seam the snapshot runner fetches through.
//! [`HttpFetcher`] implements it over `reqwest` with a per-request timeout,
//! a custom user agent, a bounded redirect policy that logs every hop, and
//! retry with exponential backoff for transient failures.

mod error;
mod fetcher;
mod http;
mod retry;
mod source;

pub use error::FetchError;
pub use fetcher::HttpFetcher;
pub use retry::RetryConfig;
pub use source::{DocumentSource, FetchedDocument};
