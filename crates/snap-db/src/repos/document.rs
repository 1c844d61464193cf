//! Document repository.

use chrono::Utc;
use snap_core::entities::Document;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::SnapService;

const DOCUMENT_COLS: &str = "document_id, service_id, module, name, updated_at";

fn row_to_document(row: &libsql::Row) -> Result<Document, DatabaseError> {
    Ok(Document {
        document_id: row.get::<i64>(0)?,
        service_id: row.get::<i64>(1)?,
        module: row.get::<String>(2)?,
        name: row.get::<String>(3)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

async fn collect(mut rows: libsql::Rows) -> Result<Vec<Document>, DatabaseError> {
    let mut documents = Vec::new();
    while let Some(row) = rows.next().await? {
        documents.push(row_to_document(&row)?);
    }
    Ok(documents)
}

pub(crate) async fn find_document(
    conn: &libsql::Connection,
    service_id: i64,
    name: &str,
) -> Result<Option<Document>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {DOCUMENT_COLS} FROM document WHERE service_id = ?1 AND name = ?2"),
            libsql::params![service_id, name],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_document(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_document(
    conn: &libsql::Connection,
    service_id: i64,
    module: &str,
    name: &str,
) -> Result<Document, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO document (service_id, module, name, updated_at) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![service_id, module, name, now.to_rfc3339()],
    )
    .await?;
    Ok(Document {
        document_id: conn.last_insert_rowid(),
        service_id,
        module: module.to_string(),
        name: name.to_string(),
        updated_at: now,
    })
}

/// Documents installed by `module`, in id order.
pub(crate) async fn documents_for_module(
    conn: &libsql::Connection,
    module: &str,
) -> Result<Vec<Document>, DatabaseError> {
    let rows = conn
        .query(
            &format!("SELECT {DOCUMENT_COLS} FROM document WHERE module = ?1 ORDER BY document_id"),
            [module],
        )
        .await?;
    collect(rows).await
}

pub(crate) async fn delete_document(
    conn: &libsql::Connection,
    document_id: i64,
) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM document WHERE document_id = ?1", [document_id])
        .await?;
    Ok(())
}

impl SnapService {
    pub async fn list_documents(&self, module: Option<&str>) -> Result<Vec<Document>, DatabaseError> {
        match module {
            Some(module) => documents_for_module(self.db().conn(), module).await,
            None => {
                let rows = self
                    .db()
                    .conn()
                    .query(
                        &format!("SELECT {DOCUMENT_COLS} FROM document ORDER BY document_id"),
                        (),
                    )
                    .await?;
                collect(rows).await
            }
        }
    }

    /// Names of all modules that installed at least one document.
    pub async fn list_modules(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT module FROM document UNION SELECT module FROM transform ORDER BY 1",
                (),
            )
            .await?;
        let mut modules = Vec::new();
        while let Some(row) = rows.next().await? {
            modules.push(row.get::<String>(0)?);
        }
        Ok(modules)
    }
}
