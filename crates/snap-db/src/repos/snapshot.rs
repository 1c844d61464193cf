//! Snapshot repository.

use std::collections::HashMap;

use snap_core::entities::{Snapshot, SnapshotSummary};
use snap_core::{SnapshotTime, content_hash};

use crate::error::DatabaseError;
use crate::helpers::{parse_date, parse_datetime, parse_time};
use crate::service::SnapService;

const SNAPSHOT_COLS: &str = "snapshot_id, job_id, date, time, datetime, content_hash, text";

fn row_to_snapshot(row: &libsql::Row) -> Result<Snapshot, DatabaseError> {
    Ok(Snapshot {
        snapshot_id: row.get::<i64>(0)?,
        job_id: row.get::<i64>(1)?,
        date: parse_date(&row.get::<String>(2)?)?,
        time: parse_time(&row.get::<String>(3)?)?,
        datetime: parse_datetime(&row.get::<String>(4)?)?,
        content_hash: row.get::<String>(5)?,
        text: row.get::<Option<String>>(6)?,
    })
}

fn row_to_summary(row: &libsql::Row) -> Result<SnapshotSummary, DatabaseError> {
    let length = row.get::<i64>(4)?;
    Ok(SnapshotSummary {
        snapshot_id: row.get::<i64>(0)?,
        job_id: row.get::<i64>(1)?,
        datetime: parse_datetime(&row.get::<String>(2)?)?,
        content_hash: row.get::<String>(3)?,
        length: u64::try_from(length)
            .map_err(|_| DatabaseError::InvalidState(format!("negative length {length}")))?,
    })
}

/// Store `text` as a new snapshot of `job_id` taken at `taken_at`.
pub(crate) async fn insert_snapshot(
    conn: &libsql::Connection,
    job_id: i64,
    taken_at: &SnapshotTime,
    text: &str,
) -> Result<Snapshot, DatabaseError> {
    let hash = content_hash(text);
    conn.execute(
        "INSERT INTO snapshot (job_id, date, time, datetime, content_hash, text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            job_id,
            taken_at.date_string(),
            taken_at.time_string(),
            taken_at.datetime_string(),
            hash.as_str(),
            text
        ],
    )
    .await?;
    Ok(Snapshot {
        snapshot_id: conn.last_insert_rowid(),
        job_id,
        date: taken_at.date(),
        time: taken_at.time(),
        datetime: taken_at.instant(),
        content_hash: hash,
        text: Some(text.to_string()),
    })
}

pub(crate) async fn count_snapshots(
    conn: &libsql::Connection,
    job_id: i64,
) -> Result<u32, DatabaseError> {
    let mut rows = conn
        .query("SELECT COUNT(*) FROM snapshot WHERE job_id = ?1", [job_id])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u32::try_from(count).map_err(|_| DatabaseError::InvalidState(format!("snapshot count {count}")))
}

pub(crate) async fn delete_snapshots(
    conn: &libsql::Connection,
    job_id: i64,
) -> Result<u32, DatabaseError> {
    let deleted = conn
        .execute("DELETE FROM snapshot WHERE job_id = ?1", [job_id])
        .await?;
    u32::try_from(deleted).map_err(|_| DatabaseError::InvalidState(format!("deleted {deleted}")))
}

impl SnapService {
    /// Store a snapshot for an existing job.
    pub async fn save_snapshot(
        &self,
        job_id: i64,
        taken_at: &SnapshotTime,
        text: &str,
    ) -> Result<Snapshot, DatabaseError> {
        insert_snapshot(self.db().conn(), job_id, taken_at, text).await
    }

    pub async fn get_snapshot(&self, snapshot_id: i64) -> Result<Snapshot, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SNAPSHOT_COLS} FROM snapshot WHERE snapshot_id = ?1"),
                [snapshot_id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("snapshot {snapshot_id} not found")))?;
        row_to_snapshot(&row)
    }

    /// Most recent snapshot of a job by `datetime`, if any.
    pub async fn latest_snapshot(&self, job_id: i64) -> Result<Option<Snapshot>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SNAPSHOT_COLS} FROM snapshot WHERE job_id = ?1
                     ORDER BY datetime DESC LIMIT 1"
                ),
                [job_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_snapshot(&row)?)),
            None => Ok(None),
        }
    }

    /// Latest snapshot of every enabled job, keyed by job id. Jobs without
    /// snapshots are absent from the map.
    pub async fn latest_snapshots(&self) -> Result<HashMap<i64, Snapshot>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT s.snapshot_id, s.job_id, s.date, s.time, s.datetime, s.content_hash, s.text
                 FROM snapshot s
                 JOIN snapshot_job j ON j.job_id = s.job_id
                 LEFT JOIN snapshot newer ON newer.job_id = s.job_id AND newer.datetime > s.datetime
                 WHERE j.is_enabled = 1 AND newer.snapshot_id IS NULL",
                (),
            )
            .await?;
        let mut latest = HashMap::new();
        while let Some(row) = rows.next().await? {
            let snapshot = row_to_snapshot(&row)?;
            latest.insert(snapshot.job_id, snapshot);
        }
        Ok(latest)
    }

    /// Snapshot history of a job, newest first, without text.
    pub async fn list_snapshots(
        &self,
        job_id: i64,
        limit: u32,
    ) -> Result<Vec<SnapshotSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT snapshot_id, job_id, datetime, content_hash, length(COALESCE(text, ''))
                 FROM snapshot WHERE job_id = ?1
                 ORDER BY datetime DESC LIMIT ?2",
                libsql::params![job_id, i64::from(limit)],
            )
            .await?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next().await? {
            summaries.push(row_to_summary(&row)?);
        }
        Ok(summaries)
    }

    /// Snapshots taken on `date` (`YYYY-MM-DD`) across all jobs, by time.
    pub async fn snapshots_on(&self, date: &str) -> Result<Vec<SnapshotSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT snapshot_id, job_id, datetime, content_hash, length(COALESCE(text, ''))
                 FROM snapshot WHERE date = ?1
                 ORDER BY time, snapshot_id",
                [date],
            )
            .await?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next().await? {
            summaries.push(row_to_summary(&row)?);
        }
        Ok(summaries)
    }
}
