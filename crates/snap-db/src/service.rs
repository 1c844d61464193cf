//! Service layer over `SnapDb`.
//!
//! `SnapService` owns the database handle. Repository methods are
//! implemented as `impl SnapService` blocks in [`crate::repos`], module
//! loading in [`crate::loader`].

use tracing::warn;

use crate::SnapDb;
use crate::error::DatabaseError;

pub struct SnapService {
    db: SnapDb,
}

impl SnapService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path`: Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SnapDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `SnapDb`.
    #[must_use]
    pub const fn from_db(db: SnapDb) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn db(&self) -> &SnapDb {
        &self.db
    }

    /// Commit `tx` if `result` is `Ok`, otherwise roll it back and pass the
    /// error through.
    pub(crate) async fn finish<T>(
        tx: libsql::Transaction,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(%rollback, "rollback failed");
                }
                Err(error)
            }
        }
    }
}
