//! The document source abstraction used by the snapshot runner.

use async_trait::async_trait;
use snap_core::SnapshotTime;

use crate::error::FetchError;

/// A fetched document body with its response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// URL that was requested.
    pub url: String,
    /// URL after following redirects.
    pub final_url: String,
    pub status: u16,
    pub body: String,
    /// Captured once, after the body has been read.
    pub fetched_at: SnapshotTime,
}

/// Anything that can produce a document body for a URL.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the document at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the document could not be retrieved.
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, FetchError>;
}
