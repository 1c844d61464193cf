use snap_core::entities::JobDetail;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::limit::explicit_limit;
use crate::context::AppContext;
use crate::output::{cell, output_rows};

const HEADERS: [&str; 9] = [
    "job", "module", "company", "service", "document", "lang", "enabled", "last_snapshot", "url",
];

/// Handle `docsnaps list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let jobs = select_jobs(ctx.service.list_jobs().await?, args, flags.limit);
    output_rows(&jobs, &HEADERS, job_row, flags.format)
}

fn select_jobs(mut jobs: Vec<JobDetail>, args: &ListArgs, limit: Option<u32>) -> Vec<JobDetail> {
    filter_jobs(&mut jobs, args);
    if let Some(limit) = explicit_limit(limit) {
        jobs.truncate(limit);
    }
    jobs
}

fn filter_jobs(jobs: &mut Vec<JobDetail>, args: &ListArgs) {
    if let Some(module) = args.module.as_deref() {
        jobs.retain(|job| job.module == module);
    }
    if args.enabled {
        jobs.retain(|job| job.is_enabled);
    }
    if args.disabled {
        jobs.retain(|job| !job.is_enabled);
    }
}

fn job_row(job: &JobDetail) -> Vec<String> {
    vec![
        job.job_id.to_string(),
        job.module.clone(),
        job.company_name.clone(),
        job.service_name.clone(),
        job.document_name.clone(),
        job.language_code.clone(),
        if job.is_enabled { "enabled" } else { "disabled" }.to_string(),
        cell(
            job.latest_snapshot_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        job.url.clone(),
    ]
}
