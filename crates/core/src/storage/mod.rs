//! Movie storage backends.
//!
//! Two interchangeable implementations sit behind [`MovieStore`]:
//! a JSON document rewritten wholesale on every mutation, and a SQLite
//! table with per-row CRUD. The backend is chosen when the store is
//! opened, never at link time.

mod document;
mod sqlite;

pub use document::{DocumentSchema, DocumentStore};
pub use sqlite::RelationalStore;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{StorageBackend, StorageConfig};
use crate::metrics;
use crate::record::{Catalog, MovieRecord};

/// Errors for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying medium cannot be opened, read or written.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Movie not found: {0}")]
    NotFound(String),

    /// The medium already holds a record with this title.
    #[error("Duplicate title: {0}")]
    DuplicateTitle(String),

    /// Stored data does not match the record schema.
    #[error("Malformed data: {0}")]
    Malformed(String),

    #[error("Store is closed")]
    Closed,
}

impl StorageError {
    /// Stable identifier used in metrics and host responses.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Unavailable(_) => "storage_unavailable",
            StorageError::NotFound(_) => "not_found",
            StorageError::DuplicateTitle(_) => "duplicate_title",
            StorageError::Malformed(_) => "malformed",
            StorageError::Closed => "closed",
        }
    }
}

/// Trait for movie storage backends.
///
/// Implementations serialize their own write path; callers never lock.
pub trait MovieStore: Send + Sync {
    /// Short backend name ("json" or "sqlite").
    fn backend_name(&self) -> &'static str;

    /// Load every stored record.
    fn list(&self) -> Result<Catalog, StorageError>;

    /// Store a new record.
    ///
    /// Fails with [`StorageError::DuplicateTitle`] if the title is taken.
    fn insert(&self, record: &MovieRecord) -> Result<(), StorageError>;

    /// Insert the record, or replace the stored one with the same title.
    fn upsert(&self, record: &MovieRecord) -> Result<(), StorageError>;

    /// Upsert a batch of records.
    ///
    /// Backends that can apply the batch atomically override this; the
    /// default stops at the first failure and keeps what was written.
    fn upsert_all(&self, records: &[MovieRecord]) -> Result<usize, StorageError> {
        for record in records {
            self.upsert(record)?;
        }
        Ok(records.len())
    }

    /// Change the rating of an existing record.
    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StorageError>;

    /// Remove a record by title.
    fn delete(&self, title: &str) -> Result<(), StorageError>;

    /// Release the underlying medium. Later calls fail with `Closed`.
    fn close(&self) -> Result<(), StorageError>;
}

/// Open the backend selected by the configuration.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn MovieStore>, StorageError> {
    let path = config.resolved_path();
    info!(
        "Opening {:?} movie store at {}",
        config.backend,
        path.display()
    );

    let store: Box<dyn MovieStore> = match config.backend {
        StorageBackend::Json => Box::new(DocumentStore::open(&path, config.document_schema)?),
        StorageBackend::Sqlite => Box::new(RelationalStore::open(&path)?),
    };
    Ok(store)
}

/// Copy every record from one store into another.
///
/// Existing titles in the target are overwritten. Returns the number of
/// records copied.
pub fn copy_catalog(from: &dyn MovieStore, to: &dyn MovieStore) -> Result<usize, StorageError> {
    let catalog = from.list()?;
    let copied = to.upsert_all(catalog.records())?;
    info!(
        "Copied {} movies from {} store to {} store",
        copied,
        from.backend_name(),
        to.backend_name()
    );
    Ok(copied)
}

/// Record the outcome of a backend call and pass it through.
pub(crate) fn observed<T>(
    backend: &'static str,
    operation: &'static str,
    result: Result<T, StorageError>,
) -> Result<T, StorageError> {
    match &result {
        Ok(_) => {
            metrics::record_store_op(backend, operation, "ok");
            debug!(backend, operation, "store operation succeeded");
        }
        Err(e) => {
            metrics::record_store_op(backend, operation, e.kind());
            debug!(backend, operation, error = %e, "store operation failed");
        }
    }
    result
}
