//! # snap-config
//!
//! Layered configuration loading for docsnaps using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DOCSNAPS_*` prefix, `__` as separator)
//! 2. Project-level `.docsnaps/config.toml`
//! 3. User-level `~/.config/docsnaps/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DOCSNAPS_FETCH__REQUEST_TIMEOUT_SECS` -> `fetch.request_timeout_secs`,
//! `DOCSNAPS_DATABASE__PATH` -> `database.path`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use snap_config::SnapConfig;
//!
//! let config = SnapConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod fetch;
mod general;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use fetch::FetchConfig;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local directory holding config and the database.
pub const PROJECT_DIR: &str = ".docsnaps";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SnapConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SnapConfig {
    /// Load configuration from all sources, resolving the project-local file
    /// against the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for_project(Path::new("."))
    }

    /// Load configuration for the project rooted at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for_project(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_for_project(Path::new("."))
    }

    /// Build the figment provider chain for a project root.
    #[must_use]
    pub fn figment_for_project(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("DOCSNAPS_").split("__"))
    }

    /// Resolve the database path against the project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    #[must_use]
    pub fn database_path(&self, project_root: &Path) -> String {
        if self.database.is_memory() {
            return self.database.path.clone();
        }
        let path = PathBuf::from(&self.database.path);
        if path.is_absolute() {
            self.database.path.clone()
        } else {
            project_root.join(path).to_string_lossy().into_owned()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.fetch.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.fetch.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docsnaps").join("config.toml"))
    }
}
