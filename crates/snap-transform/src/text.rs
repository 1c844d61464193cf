//! Plain-text steps.

use regex::Regex;

use crate::error::TransformError;

/// Regex replace-all. `replacement` may reference capture groups (`$1`).
pub fn replace(text: &str, pattern: &str, replacement: &str) -> Result<String, TransformError> {
    let regex = Regex::new(pattern).map_err(|source| TransformError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(regex.replace_all(text, replacement).into_owned())
}

/// Collapse runs of spaces and tabs into one space, trim every line, and
/// squeeze runs of blank lines into one.
pub fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let collapsed = line
            .split([' ', '\t'])
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let blank = collapsed.is_empty();
        if blank && lines.last().is_some_and(String::is_empty) {
            continue;
        }
        lines.push(collapsed);
    }
    lines.join("\n")
}
