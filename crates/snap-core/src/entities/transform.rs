use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single built-in transform step.
///
/// Steps are declared in module manifests and stored as JSON in the
/// `transform.steps` column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformStep {
    /// Replace the document with its text content, dropping all markup.
    StripTags,
    /// Keep only the HTML of the elements matching a CSS selector.
    Select { selector: String },
    /// Regex replace-all.
    Replace {
        pattern: String,
        #[serde(default)]
        replacement: String,
    },
    /// Collapse runs of spaces and tabs, trim lines, squeeze blank lines.
    CollapseWhitespace,
    /// Trim leading and trailing whitespace.
    Trim,
}

impl TransformStep {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StripTags => "strip_tags",
            Self::Select { .. } => "select",
            Self::Replace { .. } => "replace",
            Self::CollapseWhitespace => "collapse_whitespace",
            Self::Trim => "trim",
        }
    }
}

/// A transform pipeline registered by a plugin module for a document.
///
/// Natural key: `(document_id, module)`. Several modules may register
/// transforms for the same document; they run in ascending
/// `execution_priority`, ties broken by `transform_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Transform {
    pub transform_id: i64,
    pub document_id: i64,
    pub module: String,
    pub execution_priority: i64,
    pub steps: Vec<TransformStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_serialize_with_kind_tag() {
        let steps = vec![
            TransformStep::Select {
                selector: "main".into(),
            },
            TransformStep::StripTags,
        ];
        let json = serde_json::to_string(&steps).unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"select","selector":"main"},{"kind":"strip_tags"}]"#
        );
    }

    #[test]
    fn replace_defaults_to_empty_replacement() {
        let step: TransformStep =
            serde_json::from_str(r#"{"kind":"replace","pattern":"\\d+"}"#).unwrap();
        assert_eq!(
            step,
            TransformStep::Replace {
                pattern: r"\d+".into(),
                replacement: String::new(),
            }
        );
        assert_eq!(step.kind(), "replace");
    }
}
