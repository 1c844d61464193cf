//! # snap-transform
//!
//! Applies the transform pipelines that plugin modules register for their
//! documents. A pipeline is a list of [`TransformStep`]s; a document may have
//! pipelines from several modules, run in ascending execution priority with
//! ties broken by registration order.
//!
//! With no transforms the raw document passes through unchanged.

mod error;
mod html;
mod text;

pub use error::TransformError;

use snap_core::entities::{Transform, TransformStep};
use tracing::trace;

/// Apply one module's steps to `text`, in order.
///
/// # Errors
///
/// Returns [`TransformError`] if a selector or pattern is invalid, or a
/// `select` step matches nothing.
pub fn apply_steps(text: &str, steps: &[TransformStep]) -> Result<String, TransformError> {
    let mut current = text.to_string();
    for step in steps {
        current = apply_step(&current, step)?;
        trace!(kind = step.kind(), len = current.len(), "applied transform step");
    }
    Ok(current)
}

fn apply_step(text: &str, step: &TransformStep) -> Result<String, TransformError> {
    match step {
        TransformStep::StripTags => Ok(html::strip_tags(text)),
        TransformStep::Select { selector } => html::select(text, selector),
        TransformStep::Replace {
            pattern,
            replacement,
        } => text::replace(text, pattern, replacement),
        TransformStep::CollapseWhitespace => Ok(text::collapse_whitespace(text)),
        TransformStep::Trim => Ok(text.trim().to_string()),
    }
}

/// Apply every registered transform of a document to `text`.
///
/// Transforms run by ascending `execution_priority`, then `transform_id`,
/// whatever order they are passed in.
///
/// # Errors
///
/// Returns [`TransformError::Module`] naming the module whose pipeline failed.
pub fn apply_pipeline(text: &str, transforms: &[Transform]) -> Result<String, TransformError> {
    let mut ordered: Vec<&Transform> = transforms.iter().collect();
    ordered.sort_by_key(|t| (t.execution_priority, t.transform_id));

    let mut current = text.to_string();
    for transform in ordered {
        current = apply_steps(&current, &transform.steps).map_err(|source| {
            TransformError::Module {
                module: transform.module.clone(),
                source: Box::new(source),
            }
        })?;
    }
    Ok(current)
}
