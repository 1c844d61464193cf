use std::path::PathBuf;

use anyhow::Context;
use snap_config::SnapConfig;
use snap_db::service::SnapService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: SnapService,
    pub config: SnapConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the project database and bundle it with the loaded config.
    pub async fn init(project_root: PathBuf, config: SnapConfig) -> anyhow::Result<Self> {
        let db_path = config.database_path(&project_root);
        let db_file = PathBuf::from(&db_path);
        if !config.database.is_memory()
            && let Some(parent) = db_file.parent()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        tracing::debug!(path = %db_path, "opening snapshot database");
        let service = SnapService::new_local(&db_path)
            .await
            .context("failed to initialize snap-db service")?;

        Ok(Self {
            service,
            config,
            project_root,
        })
    }
}
