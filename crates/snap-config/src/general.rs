//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default number of jobs fetched at the same time.
const fn default_concurrency() -> u32 {
    4
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Maximum number of snapshot jobs fetched concurrently during a run.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Default result limit for `history` when `--limit` is unset or 0.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            default_limit: default_limit(),
        }
    }
}

impl GeneralConfig {
    /// Concurrency clamped to at least one.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        usize::try_from(self.concurrency.max(1)).unwrap_or(1)
    }
}
