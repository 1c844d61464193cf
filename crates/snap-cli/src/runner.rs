//! Snapshot runs.
//!
//! A run has two phases. Fetching and transforming happen concurrently,
//! bounded by `general.concurrency`; nothing touches the database while
//! documents are in flight. Comparing and saving then happens sequentially
//! in job-id order, so snapshot writes never interleave and results come
//! back in a stable order.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use futures::StreamExt;
use futures::stream;
use snap_core::entities::{JobDetail, Transform};
use snap_core::enums::{Comparison, JobOutcome};
use snap_core::responses::{JobResult, RunReport};
use snap_core::{SnapshotTime, content_hash};
use snap_db::service::SnapService;
use snap_fetch::DocumentSource;
use snap_transform::apply_pipeline;
use tracing::{debug, info, warn};

use crate::progress::Progress;

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    pub concurrency: usize,
    pub dry_run: bool,
}

/// Transformed text of one fetched job.
struct Fetched {
    status: u16,
    text: String,
    taken_at: SnapshotTime,
}

struct JobFailure {
    status: Option<u16>,
    message: String,
}

struct Prepared {
    job: JobDetail,
    fetched: Result<Fetched, JobFailure>,
}

/// Run every enabled job, or only `job_ids` when non-empty.
///
/// A failing job is recorded in the report and never aborts the others.
///
/// # Errors
///
/// Returns an error only when the job list or the transform pipelines cannot
/// be read.
pub async fn run_jobs(
    service: &SnapService,
    source: &dyn DocumentSource,
    job_ids: &[i64],
    options: RunOptions,
    progress: &Progress,
) -> anyhow::Result<RunReport> {
    let started_at = Utc::now();
    let jobs = service.list_active_jobs(job_ids).await?;
    warn_skipped(job_ids, &jobs);
    progress.set_total(jobs.len());

    let pipelines = load_pipelines(service, &jobs).await?;
    debug!(
        jobs = jobs.len(),
        concurrency = options.concurrency,
        "starting snapshot run"
    );

    let mut prepared: Vec<Prepared> = stream::iter(jobs.into_iter().map(|job| {
        let transforms = pipelines
            .get(&job.document_id)
            .map_or(&[][..], Vec::as_slice);
        async move {
            let fetched = fetch_and_transform(source, &job, transforms).await;
            progress.job_done(&job.label());
            Prepared { job, fetched }
        }
    }))
    .buffer_unordered(options.concurrency.max(1))
    .collect()
    .await;
    progress.finish();

    prepared.sort_by_key(|p| p.job.job_id);

    let mut results = Vec::with_capacity(prepared.len());
    for job in prepared {
        results.push(record(service, job, options.dry_run).await);
    }

    Ok(RunReport {
        started_at,
        finished_at: Utc::now(),
        dry_run: options.dry_run,
        results,
    })
}

fn warn_skipped(requested: &[i64], jobs: &[JobDetail]) {
    let active: HashSet<i64> = jobs.iter().map(|job| job.job_id).collect();
    for job_id in requested.iter().filter(|id| !active.contains(id)) {
        warn!(job_id, "job does not exist or is disabled; skipping");
    }
}

/// Transform pipelines keyed by document id.
async fn load_pipelines(
    service: &SnapService,
    jobs: &[JobDetail],
) -> anyhow::Result<HashMap<i64, Vec<Transform>>> {
    let mut pipelines = HashMap::new();
    for job in jobs {
        if !pipelines.contains_key(&job.document_id) {
            let transforms = service.transforms_for_document(job.document_id).await?;
            pipelines.insert(job.document_id, transforms);
        }
    }
    Ok(pipelines)
}

async fn fetch_and_transform(
    source: &dyn DocumentSource,
    job: &JobDetail,
    transforms: &[Transform],
) -> Result<Fetched, JobFailure> {
    let document = source
        .fetch(&job.url)
        .await
        .map_err(|error| JobFailure {
            status: error.status(),
            message: error.to_string(),
        })?;
    if document.final_url != document.url {
        debug!(
            job_id = job.job_id,
            from = %document.url,
            to = %document.final_url,
            "document was redirected"
        );
    }

    let text = apply_pipeline(&document.body, transforms).map_err(|error| JobFailure {
        status: Some(document.status),
        message: format!("transform failed: {error}"),
    })?;

    Ok(Fetched {
        status: document.status,
        text,
        taken_at: document.fetched_at,
    })
}

/// Compare one prepared job with its latest snapshot and save if needed.
async fn record(service: &SnapService, prepared: Prepared, dry_run: bool) -> JobResult {
    let Prepared { job, fetched } = prepared;
    let mut result = JobResult {
        job_id: job.job_id,
        label: job.label(),
        url: job.url.clone(),
        outcome: JobOutcome::Failed,
        status: None,
        snapshot_id: None,
        content_hash: None,
        error: None,
    };

    let fetched = match fetched {
        Ok(fetched) => fetched,
        Err(failure) => {
            warn!(job_id = job.job_id, url = %job.url, error = %failure.message, "snapshot job failed");
            result.status = failure.status;
            result.error = Some(failure.message);
            return result;
        }
    };
    result.status = Some(fetched.status);

    let previous = job
        .latest_snapshot_id
        .map(|_| job.latest_snapshot_text.as_deref());
    let comparison = Comparison::of(previous, &fetched.text);

    if !comparison.needs_snapshot() {
        result.outcome = JobOutcome::Unchanged;
        result.snapshot_id = job.latest_snapshot_id;
        result.content_hash = Some(content_hash(&fetched.text));
        info!(job_id = job.job_id, "document unchanged");
        return result;
    }

    if dry_run {
        result.outcome = JobOutcome::WouldSave;
        result.content_hash = Some(content_hash(&fetched.text));
        return result;
    }

    match service
        .save_snapshot(job.job_id, &fetched.taken_at, &fetched.text)
        .await
    {
        Ok(snapshot) => {
            result.outcome = if comparison == Comparison::NoPrevious {
                JobOutcome::FirstSnapshot
            } else {
                JobOutcome::Changed
            };
            result.snapshot_id = Some(snapshot.snapshot_id);
            result.content_hash = Some(snapshot.content_hash);
            info!(
                job_id = job.job_id,
                snapshot_id = snapshot.snapshot_id,
                outcome = %result.outcome,
                "snapshot saved"
            );
        }
        Err(error) => {
            warn!(job_id = job.job_id, %error, "failed to save snapshot");
            result.error = Some(format!("failed to save snapshot: {error}"));
        }
    }
    result
}
