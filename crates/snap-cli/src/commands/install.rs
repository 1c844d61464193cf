use anyhow::Context;
use snap_core::manifest::ModuleManifest;

use crate::cli::root_commands::InstallArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::report::install_lines;
use crate::context::AppContext;
use crate::output::{output, output_lines};

/// Handle `docsnaps install`.
pub async fn handle(args: &InstallArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let manifest = ModuleManifest::load(&args.manifest)?;
    let report = ctx
        .service
        .install_module(&manifest, args.disabled)
        .await
        .with_context(|| format!("failed to install module '{}'", manifest.name))?;

    match flags.format {
        OutputFormat::Table => output_lines(&install_lines(&report, "Installed")),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format)?,
    }
    Ok(())
}
