//! Transform error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A `select` step found no element; the page layout probably changed.
    #[error("selector '{selector}' matched nothing")]
    NoMatch { selector: String },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("transform of module '{module}' failed: {source}")]
    Module {
        module: String,
        #[source]
        source: Box<TransformError>,
    },
}
