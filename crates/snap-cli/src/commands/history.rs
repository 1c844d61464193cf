use snap_core::entities::SnapshotSummary;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HistoryArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output_rows;

/// Handle `docsnaps history`.
pub async fn handle(
    args: &HistoryArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    // Fails with "job N not found" for unknown ids instead of an empty list.
    ctx.service.get_job(args.job_id).await?;

    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
    let snapshots = ctx.service.list_snapshots(args.job_id, limit).await?;

    output_rows(
        &snapshots,
        &["snapshot", "taken_at", "length", "hash"],
        snapshot_row,
        flags.format,
    )
}

fn snapshot_row(snapshot: &SnapshotSummary) -> Vec<String> {
    vec![
        snapshot.snapshot_id.to_string(),
        snapshot.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        snapshot.length.to_string(),
        snapshot.content_hash.chars().take(12).collect(),
    ]
}
