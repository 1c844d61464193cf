//! Human-readable lines for the table format of module and run reports.

use std::fmt::Write as _;

use snap_core::enums::JobOutcome;
use snap_core::responses::{InstallReport, RunReport, UninstallReport};

/// Lines for `install` and `update`; `verb` is "Installed" or "Updated".
#[must_use]
pub fn install_lines(report: &InstallReport, verb: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "{verb} module '{}': {} jobs ({} new)",
        report.module,
        report.job_ids.len(),
        report.jobs_created
    )];
    lines.extend(report.changes.iter().map(|change| format!("  {change}")));
    lines.extend(
        report
            .jobs_disabled
            .iter()
            .map(|job_id| format!("  job #{job_id} is no longer listed and was disabled")),
    );
    lines.extend(
        report
            .warnings
            .iter()
            .map(|warning| format!("[warning] {warning}")),
    );
    lines
}

#[must_use]
pub fn uninstall_lines(report: &UninstallReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Uninstalled module '{}': removed {} jobs, {} transforms, {} documents, {} services, {} companies, {} snapshots",
        report.module,
        report.jobs_removed,
        report.transforms_removed,
        report.documents_removed,
        report.services_removed,
        report.companies_removed,
        report.snapshots_removed
    )];
    if !report.jobs_disabled.is_empty() {
        let ids = report
            .jobs_disabled
            .iter()
            .map(|id| format!("#{id}"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!(
            "[disabled] kept jobs {ids} because they hold snapshots (use --purge to delete them)"
        ));
    }
    lines
}

/// One status line per job, in job order, followed by the summary.
#[must_use]
pub fn run_lines(report: &RunReport) -> Vec<String> {
    let mut lines = report
        .results
        .iter()
        .map(|result| {
            let mut line = format!("[{}] #{} {}", result.outcome, result.job_id, result.label);
            match (result.outcome, result.snapshot_id, result.error.as_deref()) {
                (JobOutcome::Failed, _, Some(error)) => {
                    let _ = write!(line, ": {error}");
                }
                (JobOutcome::FirstSnapshot | JobOutcome::Changed, Some(id), _) => {
                    let _ = write!(line, " (snapshot {id})");
                }
                _ => {}
            }
            line
        })
        .collect::<Vec<_>>();

    let mut summary = report.summary();
    if report.dry_run && !report.results.is_empty() {
        summary.push_str(" (dry run, nothing saved)");
    }
    lines.push(summary);
    lines
}
