//! Snapshot job repository.
//!
//! Job listings join the full company / service / document / language
//! hierarchy and the latest snapshot of each job. The latest snapshot is
//! picked with an anti-join on a newer `datetime` for the same job.

use chrono::Utc;
use snap_core::entities::{JobDetail, SnapshotJob};

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_optional_datetime};
use crate::service::SnapService;

const JOB_COLS: &str = "job_id, document_id, language_id, url, is_enabled, updated_at";

fn row_to_job(row: &libsql::Row) -> Result<SnapshotJob, DatabaseError> {
    Ok(SnapshotJob {
        job_id: row.get::<i64>(0)?,
        document_id: row.get::<i64>(1)?,
        language_id: row.get::<i64>(2)?,
        url: row.get::<String>(3)?,
        is_enabled: get_bool(row, 4)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Column 12 is the latest snapshot text or `NULL`, see [`detail_sql`].
fn row_to_detail(row: &libsql::Row) -> Result<JobDetail, DatabaseError> {
    Ok(JobDetail {
        job_id: row.get::<i64>(0)?,
        document_id: row.get::<i64>(1)?,
        url: row.get::<String>(2)?,
        is_enabled: get_bool(row, 3)?,
        module: row.get::<String>(4)?,
        company_name: row.get::<String>(5)?,
        service_name: row.get::<String>(6)?,
        document_name: row.get::<String>(7)?,
        language_name: row.get::<String>(8)?,
        language_code: row.get::<String>(9)?,
        latest_snapshot_id: row.get::<Option<i64>>(10)?,
        latest_snapshot_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        latest_snapshot_text: row.get::<Option<String>>(12)?,
    })
}

fn detail_sql(with_text: bool, filter: &str) -> String {
    let text_col = if with_text { "snap.text" } else { "NULL" };
    format!(
        "SELECT j.job_id, j.document_id, j.url, j.is_enabled, d.module,
                c.name, s.name, d.name, l.name, l.code_iso_639_1,
                snap.snapshot_id, snap.datetime, {text_col}
         FROM snapshot_job j
         JOIN document d ON d.document_id = j.document_id
         JOIN service s ON s.service_id = d.service_id
         JOIN company c ON c.company_id = s.company_id
         JOIN language l ON l.language_id = j.language_id
         LEFT JOIN snapshot snap ON snap.job_id = j.job_id
         LEFT JOIN snapshot newer ON newer.job_id = j.job_id AND newer.datetime > snap.datetime
         WHERE newer.snapshot_id IS NULL {filter}
         ORDER BY j.job_id"
    )
}

async fn collect_details(mut rows: libsql::Rows) -> Result<Vec<JobDetail>, DatabaseError> {
    let mut details = Vec::new();
    while let Some(row) = rows.next().await? {
        details.push(row_to_detail(&row)?);
    }
    Ok(details)
}

pub(crate) async fn find_job(
    conn: &libsql::Connection,
    document_id: i64,
    language_id: i64,
) -> Result<Option<SnapshotJob>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {JOB_COLS} FROM snapshot_job WHERE document_id = ?1 AND language_id = ?2"
            ),
            libsql::params![document_id, language_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_job(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn get_job_by_id(
    conn: &libsql::Connection,
    job_id: i64,
) -> Result<Option<SnapshotJob>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {JOB_COLS} FROM snapshot_job WHERE job_id = ?1"),
            [job_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_job(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_job(
    conn: &libsql::Connection,
    document_id: i64,
    language_id: i64,
    url: &str,
    is_enabled: bool,
) -> Result<SnapshotJob, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO snapshot_job (document_id, language_id, url, is_enabled, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            document_id,
            language_id,
            url,
            i64::from(is_enabled),
            now.to_rfc3339()
        ],
    )
    .await?;
    Ok(SnapshotJob {
        job_id: conn.last_insert_rowid(),
        document_id,
        language_id,
        url: url.to_string(),
        is_enabled,
        updated_at: now,
    })
}

pub(crate) async fn set_job_url(
    conn: &libsql::Connection,
    job_id: i64,
    url: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE snapshot_job SET url = ?1, updated_at = ?2 WHERE job_id = ?3",
        libsql::params![url, Utc::now().to_rfc3339(), job_id],
    )
    .await?;
    Ok(())
}

pub(crate) async fn set_enabled(
    conn: &libsql::Connection,
    job_id: i64,
    is_enabled: bool,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE snapshot_job SET is_enabled = ?1, updated_at = ?2 WHERE job_id = ?3",
        libsql::params![i64::from(is_enabled), Utc::now().to_rfc3339(), job_id],
    )
    .await?;
    Ok(())
}

pub(crate) async fn jobs_for_document(
    conn: &libsql::Connection,
    document_id: i64,
) -> Result<Vec<SnapshotJob>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {JOB_COLS} FROM snapshot_job WHERE document_id = ?1 ORDER BY job_id"),
            [document_id],
        )
        .await?;
    let mut jobs = Vec::new();
    while let Some(row) = rows.next().await? {
        jobs.push(row_to_job(&row)?);
    }
    Ok(jobs)
}

/// Jobs whose document was installed by `module`.
pub(crate) async fn jobs_for_module(
    conn: &libsql::Connection,
    module: &str,
) -> Result<Vec<SnapshotJob>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT j.job_id, j.document_id, j.language_id, j.url, j.is_enabled, j.updated_at
             FROM snapshot_job j
             JOIN document d ON d.document_id = j.document_id
             WHERE d.module = ?1
             ORDER BY j.job_id",
            [module],
        )
        .await?;
    let mut jobs = Vec::new();
    while let Some(row) = rows.next().await? {
        jobs.push(row_to_job(&row)?);
    }
    Ok(jobs)
}

pub(crate) async fn delete_job(conn: &libsql::Connection, job_id: i64) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM snapshot_job WHERE job_id = ?1", [job_id])
        .await?;
    Ok(())
}

impl SnapService {
    /// All jobs with hierarchy names and latest snapshot (text omitted).
    pub async fn list_jobs(&self) -> Result<Vec<JobDetail>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(&detail_sql(false, ""), ())
            .await?;
        collect_details(rows).await
    }

    /// Enabled jobs with the text of their latest snapshot, in job-id order.
    ///
    /// When `job_ids` is non-empty only those jobs are returned (still only
    /// if enabled). Ids that do not exist are silently skipped.
    pub async fn list_active_jobs(&self, job_ids: &[i64]) -> Result<Vec<JobDetail>, DatabaseError> {
        let filter = if job_ids.is_empty() {
            "AND j.is_enabled = 1".to_string()
        } else {
            let placeholders: Vec<String> = (1..=job_ids.len()).map(|i| format!("?{i}")).collect();
            format!(
                "AND j.is_enabled = 1 AND j.job_id IN ({})",
                placeholders.join(", ")
            )
        };
        let params: Vec<libsql::Value> = job_ids.iter().map(|&id| id.into()).collect();
        let rows = self
            .db()
            .conn()
            .query(&detail_sql(true, &filter), params)
            .await?;
        collect_details(rows).await
    }

    pub async fn get_job(&self, job_id: i64) -> Result<SnapshotJob, DatabaseError> {
        get_job_by_id(self.db().conn(), job_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("job {job_id} not found")))
    }

    /// Enable or disable a job. Returns the updated job.
    pub async fn set_job_enabled(
        &self,
        job_id: i64,
        is_enabled: bool,
    ) -> Result<SnapshotJob, DatabaseError> {
        let job = self.get_job(job_id).await?;
        if job.is_enabled != is_enabled {
            set_enabled(self.db().conn(), job_id, is_enabled).await?;
        }
        self.get_job(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::repos::snapshot::insert_snapshot;
    use crate::test_support::{acme_manifest, test_service};
    use snap_core::SnapshotTime;

    #[tokio::test]
    async fn list_jobs_joins_hierarchy() {
        let svc = test_service().await;
        svc.install_module(&acme_manifest(), false).await.unwrap();

        let jobs = svc.list_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company_name, "Acme");
        assert_eq!(jobs[0].service_name, "Acme Cloud");
        assert_eq!(jobs[0].document_name, "Terms of Use");
        assert_eq!(jobs[0].language_code, "en");
        assert_eq!(jobs[1].language_name, "French");
        assert_eq!(jobs[0].module, "acme.legal");
        assert!(jobs.iter().all(|j| j.latest_snapshot_id.is_none()));
    }

    #[tokio::test]
    async fn latest_snapshot_is_newest_by_datetime() {
        let svc = test_service().await;
        let report = svc.install_module(&acme_manifest(), false).await.unwrap();
        let job_id = report.job_ids[0];
        let conn = svc.db().conn();

        let older = SnapshotTime::from_datetime("2026-01-01T00:00:00Z".parse().unwrap());
        let newer = SnapshotTime::from_datetime("2026-02-01T00:00:00Z".parse().unwrap());
        // Insert the newer one first so id order and time order disagree.
        let latest = insert_snapshot(conn, job_id, &newer, "v2").await.unwrap();
        insert_snapshot(conn, job_id, &older, "v1").await.unwrap();

        let active = svc.list_active_jobs(&[job_id]).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].latest_snapshot_id, Some(latest.snapshot_id));
        assert_eq!(active[0].latest_snapshot_text.as_deref(), Some("v2"));

        let listed = svc.list_jobs().await.unwrap();
        assert_eq!(listed[0].latest_snapshot_at, Some(newer.instant()));
        assert_eq!(listed[0].latest_snapshot_text, None);
    }

    #[tokio::test]
    async fn active_jobs_skip_disabled_and_unknown_ids() {
        let svc = test_service().await;
        let report = svc.install_module(&acme_manifest(), false).await.unwrap();
        let (en, fr) = (report.job_ids[0], report.job_ids[1]);

        svc.set_job_enabled(fr, false).await.unwrap();

        let all: Vec<i64> = svc
            .list_active_jobs(&[])
            .await
            .unwrap()
            .iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(all, [en]);

        let filtered = svc.list_active_jobs(&[fr, 9999]).await.unwrap();
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn set_job_enabled_round_trip() {
        let svc = test_service().await;
        let report = svc.install_module(&acme_manifest(), false).await.unwrap();
        let job_id = report.job_ids[0];

        let disabled = svc.set_job_enabled(job_id, false).await.unwrap();
        assert!(!disabled.is_enabled);
        let enabled = svc.set_job_enabled(job_id, true).await.unwrap();
        assert!(enabled.is_enabled);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let svc = test_service().await;
        let err = svc.set_job_enabled(42, true).await.unwrap_err();
        assert_eq!(err.to_string(), "job 42 not found");
    }
}
