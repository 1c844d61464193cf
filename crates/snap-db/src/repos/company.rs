//! Company repository.

use chrono::Utc;
use snap_core::entities::Company;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SnapService;

const COMPANY_COLS: &str = "company_id, name, website, updated_at";

fn row_to_company(row: &libsql::Row) -> Result<Company, DatabaseError> {
    Ok(Company {
        company_id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        website: get_opt_string(row, 2)?,
        updated_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

pub(crate) async fn find_company(
    conn: &libsql::Connection,
    name: &str,
) -> Result<Option<Company>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {COMPANY_COLS} FROM company WHERE name = ?1"),
            [name],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_company(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_company(
    conn: &libsql::Connection,
    name: &str,
    website: Option<&str>,
) -> Result<Company, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO company (name, website, updated_at) VALUES (?1, ?2, ?3)",
        libsql::params![name, website, now.to_rfc3339()],
    )
    .await?;
    Ok(Company {
        company_id: conn.last_insert_rowid(),
        name: name.to_string(),
        website: website.map(String::from),
        updated_at: now,
    })
}

pub(crate) async fn set_company_website(
    conn: &libsql::Connection,
    company_id: i64,
    website: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE company SET website = ?1, updated_at = ?2 WHERE company_id = ?3",
        libsql::params![website, Utc::now().to_rfc3339(), company_id],
    )
    .await?;
    Ok(())
}

/// Delete the company if no service references it. Returns whether a row
/// was deleted.
pub(crate) async fn delete_company_if_orphan(
    conn: &libsql::Connection,
    company_id: i64,
) -> Result<bool, DatabaseError> {
    let deleted = conn
        .execute(
            "DELETE FROM company WHERE company_id = ?1
               AND NOT EXISTS (SELECT 1 FROM service WHERE service.company_id = ?1)",
            [company_id],
        )
        .await?;
    Ok(deleted > 0)
}

impl SnapService {
    pub async fn get_company(&self, name: &str) -> Result<Company, DatabaseError> {
        find_company(self.db().conn(), name)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("company '{name}' not found")))
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {COMPANY_COLS} FROM company ORDER BY name"),
                (),
            )
            .await?;
        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            companies.push(row_to_company(&row)?);
        }
        Ok(companies)
    }
}
