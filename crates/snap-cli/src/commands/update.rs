use anyhow::Context;
use snap_core::manifest::ModuleManifest;

use crate::cli::root_commands::UpdateArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::report::install_lines;
use crate::context::AppContext;
use crate::output::{output, output_lines};

/// Handle `docsnaps update`.
pub async fn handle(args: &UpdateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let manifest = ModuleManifest::load(&args.manifest)?;
    let report = ctx
        .service
        .update_module(&manifest)
        .await
        .with_context(|| format!("failed to update module '{}'", manifest.name))?;

    match flags.format {
        OutputFormat::Table => output_lines(&install_lines(&report, "Updated")),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format)?,
    }
    Ok(())
}
