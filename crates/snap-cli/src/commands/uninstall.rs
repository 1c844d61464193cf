use crate::cli::root_commands::UninstallArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::report::uninstall_lines;
use crate::context::AppContext;
use crate::output::{output, output_lines};

/// Handle `docsnaps uninstall`.
pub async fn handle(
    args: &UninstallArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = ctx
        .service
        .uninstall_module(&args.module, args.purge)
        .await?;

    match flags.format {
        OutputFormat::Table => output_lines(&uninstall_lines(&report)),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format)?,
    }
    Ok(())
}
