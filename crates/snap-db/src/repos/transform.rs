//! Transform repository.
//!
//! A transform row holds one module's step pipeline for one document.

use snap_core::entities::{Transform, TransformStep};

use crate::error::DatabaseError;
use crate::helpers::{encode_steps, parse_steps};
use crate::service::SnapService;

const TRANSFORM_COLS: &str = "transform_id, document_id, module, execution_priority, steps";

fn row_to_transform(row: &libsql::Row) -> Result<Transform, DatabaseError> {
    Ok(Transform {
        transform_id: row.get::<i64>(0)?,
        document_id: row.get::<i64>(1)?,
        module: row.get::<String>(2)?,
        execution_priority: row.get::<i64>(3)?,
        steps: parse_steps(&row.get::<String>(4)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Transform>, DatabaseError> {
    let mut transforms = Vec::new();
    while let Some(row) = rows.next().await? {
        transforms.push(row_to_transform(&row)?);
    }
    Ok(transforms)
}

pub(crate) async fn find_transform(
    conn: &libsql::Connection,
    document_id: i64,
    module: &str,
) -> Result<Option<Transform>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {TRANSFORM_COLS} FROM transform WHERE document_id = ?1 AND module = ?2"),
            libsql::params![document_id, module],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_transform(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_transform(
    conn: &libsql::Connection,
    document_id: i64,
    module: &str,
    execution_priority: i64,
    steps: &[TransformStep],
) -> Result<Transform, DatabaseError> {
    conn.execute(
        "INSERT INTO transform (document_id, module, execution_priority, steps)
         VALUES (?1, ?2, ?3, ?4)",
        libsql::params![document_id, module, execution_priority, encode_steps(steps)?],
    )
    .await?;
    Ok(Transform {
        transform_id: conn.last_insert_rowid(),
        document_id,
        module: module.to_string(),
        execution_priority,
        steps: steps.to_vec(),
    })
}

pub(crate) async fn set_transform(
    conn: &libsql::Connection,
    transform_id: i64,
    execution_priority: i64,
    steps: &[TransformStep],
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE transform SET execution_priority = ?1, steps = ?2 WHERE transform_id = ?3",
        libsql::params![execution_priority, encode_steps(steps)?, transform_id],
    )
    .await?;
    Ok(())
}

pub(crate) async fn delete_transforms_for_module(
    conn: &libsql::Connection,
    module: &str,
) -> Result<u32, DatabaseError> {
    let deleted = conn
        .execute("DELETE FROM transform WHERE module = ?1", [module])
        .await?;
    u32::try_from(deleted).map_err(|_| DatabaseError::InvalidState(format!("deleted {deleted}")))
}

pub(crate) async fn delete_transforms_for_document(
    conn: &libsql::Connection,
    document_id: i64,
) -> Result<u32, DatabaseError> {
    let deleted = conn
        .execute("DELETE FROM transform WHERE document_id = ?1", [document_id])
        .await?;
    u32::try_from(deleted).map_err(|_| DatabaseError::InvalidState(format!("deleted {deleted}")))
}

pub(crate) async fn count_transforms_for_module(
    conn: &libsql::Connection,
    module: &str,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("SELECT COUNT(*) FROM transform WHERE module = ?1", [module])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl SnapService {
    /// Transforms registered for a document in execution order: ascending
    /// priority, ties broken by registration order.
    pub async fn transforms_for_document(
        &self,
        document_id: i64,
    ) -> Result<Vec<Transform>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {TRANSFORM_COLS} FROM transform WHERE document_id = ?1
                     ORDER BY execution_priority, transform_id"
                ),
                [document_id],
            )
            .await?;
        collect(rows).await
    }

    pub async fn list_transforms(&self, module: &str) -> Result<Vec<Transform>, DatabaseError> {
        let rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {TRANSFORM_COLS} FROM transform WHERE module = ?1 ORDER BY transform_id"),
                [module],
            )
            .await?;
        collect(rows).await
    }
}
