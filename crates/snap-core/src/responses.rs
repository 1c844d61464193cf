//! CLI response types returned by `docsnaps` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::JobOutcome;

/// Response from `docsnaps install` and `docsnaps update`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InstallReport {
    pub module: String,
    /// Job ids covered by the manifest, in manifest order.
    pub job_ids: Vec<i64>,
    /// Jobs created by this invocation.
    pub jobs_created: u32,
    /// Existing records whose values were overwritten (update only).
    pub changes: Vec<String>,
    /// Jobs disabled because the manifest no longer lists them (update only).
    pub jobs_disabled: Vec<i64>,
    /// Existing records left untouched although the manifest disagrees.
    pub warnings: Vec<String>,
}

/// Response from `docsnaps uninstall`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UninstallReport {
    pub module: String,
    pub transforms_removed: u32,
    pub jobs_removed: u32,
    /// Jobs kept (disabled) because they still hold snapshots.
    pub jobs_disabled: Vec<i64>,
    pub snapshots_removed: u32,
    pub documents_removed: u32,
    pub services_removed: u32,
    pub companies_removed: u32,
}

/// Result of one job within a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JobResult {
    pub job_id: i64,
    pub label: String,
    pub url: String,
    pub outcome: JobOutcome,
    /// HTTP status of the final response, when one was received.
    pub status: Option<u16>,
    pub snapshot_id: Option<i64>,
    pub content_hash: Option<String>,
    pub error: Option<String>,
}

/// Response from `docsnaps run`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub results: Vec<JobResult>,
}

impl RunReport {
    #[must_use]
    pub fn count(&self, outcome: JobOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.count(JobOutcome::Failed) > 0
    }

    /// One-line summary, e.g. `"3 jobs: 1 changed, 1 unchanged, 1 failed"`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.results.is_empty() {
            return "No active jobs found.".to_string();
        }
        let parts: Vec<String> = [
            JobOutcome::FirstSnapshot,
            JobOutcome::Changed,
            JobOutcome::WouldSave,
            JobOutcome::Unchanged,
            JobOutcome::Failed,
        ]
        .into_iter()
        .filter_map(|outcome| {
            let n = self.count(outcome);
            (n > 0).then(|| format!("{n} {}", outcome.as_str().replace('_', " ")))
        })
        .collect();
        format!("{} jobs: {}", self.results.len(), parts.join(", "))
    }
}
