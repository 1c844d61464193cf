use std::path::{Path, PathBuf};

use anyhow::Context;
use snap_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.docsnaps` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Map a `--project` argument to the project root. The argument may name the
/// root itself or its `.docsnaps` directory.
///
/// # Errors
///
/// Returns an error when the argument is a bare `.docsnaps` with no parent.
pub fn project_root_from_arg(path: &Path) -> anyhow::Result<PathBuf> {
    if path.file_name().is_some_and(|name| name == PROJECT_DIR) {
        let parent = path
            .parent()
            .context("invalid --project path: '.docsnaps' directory has no parent")?;
        return Ok(if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        });
    }
    Ok(path.to_path_buf())
}
