use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A stored copy of a document's transformed content at a point in time.
///
/// `date`, `time`, and `datetime` are derived from the same instant, see
/// [`crate::SnapshotTime`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Snapshot {
    pub snapshot_id: i64,
    pub job_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub datetime: DateTime<Utc>,
    pub content_hash: String,
    pub text: Option<String>,
}

/// Snapshot row without its text, for history listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub snapshot_id: i64,
    pub job_id: i64,
    pub datetime: DateTime<Utc>,
    pub content_hash: String,
    pub length: u64,
}
