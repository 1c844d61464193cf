use snap_fetch::HttpFetcher;

use crate::cli::root_commands::RunArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::report::run_lines;
use crate::context::AppContext;
use crate::output::{output, output_lines};
use crate::progress::Progress;
use crate::runner::{RunOptions, run_jobs};

/// Exit code of a run with failed jobs under `--fail-on-error`.
const FAILED_JOBS_EXIT_CODE: i32 = 2;

/// Handle `docsnaps run`.
pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<i32> {
    let fetcher = HttpFetcher::from_config(&ctx.config.fetch)?;
    let options = RunOptions {
        concurrency: ctx.config.general.effective_concurrency(),
        dry_run: args.dry_run,
    };

    let progress = Progress::jobs();
    let report = run_jobs(&ctx.service, &fetcher, &args.jobs, options, &progress).await?;

    match flags.format {
        OutputFormat::Table => output_lines(&run_lines(&report)),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format)?,
    }

    Ok(exit_code(report.has_failures(), args.fail_on_error))
}

const fn exit_code(has_failures: bool, fail_on_error: bool) -> i32 {
    if has_failures && fail_on_error {
        FAILED_JOBS_EXIT_CODE
    } else {
        0
    }
}
