use std::path::Path;

use anyhow::Context;
use snap_config::SnapConfig;

/// Load `.env` from the project root, then the layered config.
pub fn load_config(project_root: &Path) -> anyhow::Result<SnapConfig> {
    load_project_dotenv(project_root)?;
    SnapConfig::load_for_project(project_root).map_err(anyhow::Error::from)
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::load_config;

    #[test]
    fn project_config_file_is_applied() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".docsnaps")).expect(".docsnaps should create");
        std::fs::write(
            temp.path().join(".docsnaps/config.toml"),
            "[general]\nconcurrency = 9\n",
        )
        .expect("config should write");

        let config = load_config(temp.path()).expect("config should load");
        assert_eq!(config.general.concurrency, 9);
    }

    #[test]
    fn invalid_project_config_is_an_error() {
        let temp = TempDir::new().expect("tempdir should create");
        std::fs::create_dir(temp.path().join(".docsnaps")).expect(".docsnaps should create");
        std::fs::write(
            temp.path().join(".docsnaps/config.toml"),
            "[fetch]\nmax_attempts = 0\n",
        )
        .expect("config should write");

        assert!(load_config(temp.path()).is_err());
    }
}
