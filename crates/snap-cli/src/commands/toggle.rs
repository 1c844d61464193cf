use crate::cli::GlobalFlags;
use crate::cli::root_commands::JobArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `docsnaps enable` and `docsnaps disable`.
pub async fn handle(
    args: &JobArgs,
    enabled: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let job = ctx.service.set_job_enabled(args.job_id, enabled).await?;
    output(&job, flags.format)
}
