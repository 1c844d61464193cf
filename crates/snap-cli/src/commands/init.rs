use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use snap_config::PROJECT_DIR;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::{AppContext, project_root_from_arg};
use crate::output::output;

const CONFIG_TEMPLATE: &str = r#"# docsnaps project configuration.
# Every key is optional; environment variables DOCSNAPS_<SECTION>__<KEY> win.

[database]
# path = ".docsnaps/docsnaps.db"

[fetch]
# request_timeout_secs = 10
# max_redirects = 10
# max_attempts = 3

[general]
# concurrency = 4
"#;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    database: String,
    created: bool,
}

/// Handle `docsnaps init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = init_root(args, flags)?;
    let created = scaffold(&root)?;
    let config = crate::bootstrap::load_config(&root)?;
    let ctx = AppContext::init(root.clone(), config).await?;

    output(
        &InitResponse {
            project_root: root.display().to_string(),
            database: ctx.config.database_path(&ctx.project_root),
            created,
        },
        flags.format,
    )
}

/// The directory to initialize: the positional path, else `--project`, else
/// the working directory. A path naming `.docsnaps` itself means its parent.
fn init_root(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<PathBuf> {
    match (&args.path, &flags.project) {
        (Some(path), _) => project_root_from_arg(path),
        (None, Some(project)) => project_root_from_arg(Path::new(project)),
        (None, None) => std::env::current_dir().context("failed to read current directory"),
    }
}

/// Create `.docsnaps/` with a commented config file. Returns false when the
/// project already existed.
fn scaffold(root: &Path) -> anyhow::Result<bool> {
    let dir = root.join(PROJECT_DIR);
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let config_path = dir.join("config.toml");
    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    Ok(true)
}
