//! Language repository, keyed by ISO 639-1 code.

use snap_core::entities::Language;

use crate::error::DatabaseError;
use crate::service::SnapService;

const LANGUAGE_COLS: &str = "language_id, name, code_iso_639_1";

fn row_to_language(row: &libsql::Row) -> Result<Language, DatabaseError> {
    Ok(Language {
        language_id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        code_iso_639_1: row.get::<String>(2)?,
    })
}

pub(crate) async fn find_language(
    conn: &libsql::Connection,
    code: &str,
) -> Result<Option<Language>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {LANGUAGE_COLS} FROM language WHERE code_iso_639_1 = ?1"),
            [code],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_language(&row)?)),
        None => Ok(None),
    }
}

pub(crate) async fn insert_language(
    conn: &libsql::Connection,
    name: &str,
    code: &str,
) -> Result<Language, DatabaseError> {
    conn.execute(
        "INSERT INTO language (name, code_iso_639_1) VALUES (?1, ?2)",
        libsql::params![name, code],
    )
    .await?;
    Ok(Language {
        language_id: conn.last_insert_rowid(),
        name: name.to_string(),
        code_iso_639_1: code.to_string(),
    })
}

pub(crate) async fn set_language_name(
    conn: &libsql::Connection,
    language_id: i64,
    name: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE language SET name = ?1 WHERE language_id = ?2",
        libsql::params![name, language_id],
    )
    .await?;
    Ok(())
}

impl SnapService {
    pub async fn list_languages(&self) -> Result<Vec<Language>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {LANGUAGE_COLS} FROM language ORDER BY code_iso_639_1"),
                (),
            )
            .await?;
        let mut languages = Vec::new();
        while let Some(row) = rows.next().await? {
            languages.push(row_to_language(&row)?);
        }
        Ok(languages)
    }
}
