//! Snapshot timestamps and content hashing.
//!
//! A snapshot carries discrete `date` and `time` columns (index-friendly) and
//! a `datetime` column (range queries). Reading the clock once per column lets
//! them disagree when execution is slow or crosses midnight, so all three are
//! derived from one captured instant.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

/// One captured instant, rendered into the three snapshot time columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTime {
    instant: DateTime<Utc>,
}

impl SnapshotTime {
    /// Capture the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Use an existing instant, truncated to microseconds so that the stored
    /// text round-trips exactly.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let micros = instant.timestamp_micros();
        let instant = DateTime::from_timestamp_micros(micros).unwrap_or(instant);
        Self { instant }
    }

    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.instant.time()
    }

    /// `YYYY-MM-DD`.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date().format("%Y-%m-%d").to_string()
    }

    /// `HH:MM:SS.ffffff`.
    #[must_use]
    pub fn time_string(&self) -> String {
        self.time().format("%H:%M:%S%.6f").to_string()
    }

    /// RFC 3339 with fixed microsecond precision and a `Z` suffix.
    ///
    /// Fixed width means lexical order equals chronological order, which the
    /// latest-snapshot query relies on.
    #[must_use]
    pub fn datetime_string(&self) -> String {
        self.instant.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// SHA-256 hex digest of snapshot text.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
