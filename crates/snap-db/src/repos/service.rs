//! Service repository (the products a company offers).

use chrono::Utc;
use snap_core::entities::Service;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SnapService;

const SERVICE_COLS: &str = "service_id, company_id, name, website, updated_at";

fn row_to_service(row: &libsql::Row) -> Result<Service, DatabaseError> {
    Ok(Service {
        service_id: row.get::<i64>(0)?,
        company_id: row.get::<i64>(1)?,
        name: row.get::<String>(2)?,
        website: get_opt_string(row, 3)?,
        updated_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

pub(crate) async fn find_service(
    conn: &libsql::Connection,
    company_id: i64,
    name: &str,
) -> Result<Option<Service>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SERVICE_COLS} FROM service WHERE company_id = ?1 AND name = ?2"),
            libsql::params![company_id, name],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_service(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn get_service_by_id(
    conn: &libsql::Connection,
    service_id: i64,
) -> Result<Service, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SERVICE_COLS} FROM service WHERE service_id = ?1"),
            [service_id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    row_to_service(&row)
}

pub(crate) async fn insert_service(
    conn: &libsql::Connection,
    company_id: i64,
    name: &str,
    website: Option<&str>,
) -> Result<Service, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO service (company_id, name, website, updated_at) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![company_id, name, website, now.to_rfc3339()],
    )
    .await?;
    Ok(Service {
        service_id: conn.last_insert_rowid(),
        company_id,
        name: name.to_string(),
        website: website.map(String::from),
        updated_at: now,
    })
}

pub(crate) async fn set_service_website(
    conn: &libsql::Connection,
    service_id: i64,
    website: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE service SET website = ?1, updated_at = ?2 WHERE service_id = ?3",
        libsql::params![website, Utc::now().to_rfc3339(), service_id],
    )
    .await?;
    Ok(())
}

/// Delete the service if no document references it. Returns whether a row
/// was deleted.
pub(crate) async fn delete_service_if_orphan(
    conn: &libsql::Connection,
    service_id: i64,
) -> Result<bool, DatabaseError> {
    let deleted = conn
        .execute(
            "DELETE FROM service WHERE service_id = ?1
               AND NOT EXISTS (SELECT 1 FROM document WHERE document.service_id = ?1)",
            [service_id],
        )
        .await?;
    Ok(deleted > 0)
}

impl SnapService {
    pub async fn list_services(&self, company_id: i64) -> Result<Vec<Service>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SERVICE_COLS} FROM service WHERE company_id = ?1 ORDER BY name"),
                [company_id],
            )
            .await?;
        let mut services = Vec::new();
        while let Some(row) = rows.next().await? {
            services.push(row_to_service(&row)?);
        }
        Ok(services)
    }
}
