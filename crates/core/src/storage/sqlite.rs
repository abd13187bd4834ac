//! SQLite-backed movie store implementation.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::info;

use super::{observed, MovieStore, StorageError};
use crate::record::{Catalog, MovieRecord};

const BACKEND: &str = "sqlite";

const UPSERT_SQL: &str = "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(title) DO UPDATE SET
        year = excluded.year,
        rating = excluded.rating,
        poster = excluded.poster";

/// SQLite-backed movie store.
pub struct RelationalStore {
    conn: Mutex<Option<Connection>>,
}

impl RelationalStore {
    /// Open the database file, creating it and the `movies` table if needed.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("{}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| StorageError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::initialize_schema(&conn)?;
        info!("Relational store ready at {}", path.display());
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT UNIQUE NOT NULL,
                year INTEGER NOT NULL,
                rating REAL NOT NULL,
                poster TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(())
    }

    /// Run `f` against the open connection under the store lock.
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Unavailable("relational store lock poisoned".to_string()))?;
        match guard.as_ref() {
            Some(conn) => f(conn),
            None => Err(StorageError::Closed),
        }
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<MovieRecord> {
        Ok(MovieRecord {
            title: row.get(0)?,
            year: row.get(1)?,
            rating: row.get(2)?,
            poster: row.get(3)?,
        })
    }
}

/// Map a rusqlite error onto the storage taxonomy.
fn db_err(e: rusqlite::Error) -> StorageError {
    match e {
        rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => StorageError::Malformed(e.to_string()),
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StorageError::Malformed(e.to_string())
        }
        _ => StorageError::Unavailable(e.to_string()),
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl MovieStore for RelationalStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn list(&self) -> Result<Catalog, StorageError> {
        let result = self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT title, year, rating, poster FROM movies ORDER BY id")
                .map_err(db_err)?;

            let rows = stmt.query_map([], Self::row_to_record).map_err(db_err)?;

            let mut catalog = Catalog::new();
            for row in rows {
                catalog.upsert(row.map_err(db_err)?);
            }
            Ok(catalog)
        });
        observed(BACKEND, "list", result)
    }

    fn insert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        let result = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO movies (title, year, rating, poster) VALUES (?1, ?2, ?3, ?4)",
                params![&record.title, record.year, record.rating, &record.poster],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::DuplicateTitle(record.title.clone())
                } else {
                    db_err(e)
                }
            })?;
            Ok(())
        });
        observed(BACKEND, "insert", result)
    }

    fn upsert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        let result = self.with_conn(|conn| {
            conn.execute(
                UPSERT_SQL,
                params![&record.title, record.year, record.rating, &record.poster],
            )
            .map_err(db_err)?;
            Ok(())
        });
        observed(BACKEND, "upsert", result)
    }

    fn upsert_all(&self, records: &[MovieRecord]) -> Result<usize, StorageError> {
        let result = self.with_conn(|conn| {
            let tx = conn.unchecked_transaction().map_err(db_err)?;
            {
                let mut stmt = tx.prepare_cached(UPSERT_SQL).map_err(db_err)?;
                for record in records {
                    stmt.execute(params![
                        &record.title,
                        record.year,
                        record.rating,
                        &record.poster
                    ])
                    .map_err(db_err)?;
                }
            }
            tx.commit().map_err(db_err)?;
            Ok(records.len())
        });
        observed(BACKEND, "upsert_all", result)
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StorageError> {
        let result = self.with_conn(|conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE movies SET rating = ?1 WHERE title = ?2",
                    params![rating, title],
                )
                .map_err(db_err)?;

            if rows_affected == 0 {
                return Err(StorageError::NotFound(title.to_string()));
            }
            Ok(())
        });
        observed(BACKEND, "update_rating", result)
    }

    fn delete(&self, title: &str) -> Result<(), StorageError> {
        let result = self.with_conn(|conn| {
            let rows_affected = conn
                .execute("DELETE FROM movies WHERE title = ?1", params![title])
                .map_err(db_err)?;

            if rows_affected == 0 {
                return Err(StorageError::NotFound(title.to_string()));
            }
            Ok(())
        });
        observed(BACKEND, "delete", result)
    }

    fn close(&self) -> Result<(), StorageError> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| StorageError::Unavailable("relational store lock poisoned".to_string()))?;
        let conn = guard.take().ok_or(StorageError::Closed)?;
        conn.close()
            .map_err(|(_, e)| StorageError::Unavailable(e.to_string()))?;
        info!("Closed relational store");
        Ok(())
    }
}
