use crate::cli::root_commands::SnapshotArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Handle `docsnaps show`: print a stored snapshot's text.
pub async fn handle(
    args: &SnapshotArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let snapshot = ctx.service.get_snapshot(args.snapshot_id).await?;
    match flags.format {
        OutputFormat::Json => output(&snapshot, flags.format),
        OutputFormat::Table | OutputFormat::Raw => {
            println!("{}", snapshot.text.as_deref().unwrap_or(""));
            Ok(())
        }
    }
}
