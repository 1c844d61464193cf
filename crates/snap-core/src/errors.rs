//! Cross-cutting error types for docsnaps.
//!
//! Domain-specific errors (`DatabaseError`, `FetchError`, `TransformError`)
//! live in their own crates. The CLI converges all of them on `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any docsnaps crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A plugin module manifest failed validation.
    ///
    /// Carries every problem found, not just the first one.
    #[error("Invalid module '{module}':\n  - {}", .problems.join("\n  - "))]
    InvalidModule {
        module: String,
        problems: Vec<String>,
    },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A manifest file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A manifest file is not valid TOML for the manifest schema.
    #[error("Failed to parse module manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
