//! Status enums for docsnaps.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// JobOutcome
// ---------------------------------------------------------------------------

/// Result of executing one snapshot job during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    /// No earlier snapshot existed; the first one was saved.
    FirstSnapshot,
    /// Content differed from the latest snapshot; a new one was saved.
    Changed,
    /// Content matched the latest snapshot; nothing was saved.
    Unchanged,
    /// Fetching, transforming, or saving failed.
    Failed,
    /// Dry run: a snapshot would have been saved.
    WouldSave,
}

impl JobOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstSnapshot => "first_snapshot",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Failed => "failed",
            Self::WouldSave => "would_save",
        }
    }

    /// Whether this outcome wrote a snapshot row.
    #[must_use]
    pub const fn saved(self) -> bool {
        matches!(self, Self::FirstSnapshot | Self::Changed)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Comparison of freshly transformed text with the latest stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    NoPrevious,
    Changed,
    Unchanged,
}

impl Comparison {
    /// Compare new text with the previous snapshot text, if any.
    ///
    /// A stored snapshot with NULL text counts as different from any fetched
    /// text.
    #[must_use]
    pub fn of(previous: Option<Option<&str>>, current: &str) -> Self {
        match previous {
            None => Self::NoPrevious,
            Some(Some(prev)) if prev == current => Self::Unchanged,
            Some(_) => Self::Changed,
        }
    }

    #[must_use]
    pub const fn needs_snapshot(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}
