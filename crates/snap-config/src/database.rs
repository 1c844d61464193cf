//! Database location.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".docsnaps/docsnaps.db".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. Relative paths resolve against the
    /// project root.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether the path names SQLite's in-memory database.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
