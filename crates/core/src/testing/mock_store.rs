//! In-memory movie store for testing.

use std::sync::Mutex;

use crate::record::{Catalog, MovieRecord};
use crate::storage::{MovieStore, StorageError};

/// A store operation recorded for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedStoreOp {
    List,
    Insert(String),
    Upsert(String),
    UpdateRating(String, f64),
    Delete(String),
    Close,
}

#[derive(Debug, Default)]
struct MockStoreState {
    catalog: Catalog,
    ops: Vec<RecordedStoreOp>,
    next_error: Option<StorageError>,
    closed: bool,
}

/// Mock implementation of the MovieStore trait.
///
/// Behaves like a real backend (unique titles, `NotFound` on missing
/// titles, `Closed` after close) and additionally supports error injection
/// and operation recording.
#[derive(Debug, Default)]
pub struct MockStore {
    state: Mutex<MockStoreState>,
}

impl MockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with records.
    pub fn with_records(records: Vec<MovieRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state.catalog = Catalog::from_records(records);
        }
        store
    }

    /// Put a record straight into the store without recording an operation.
    ///
    /// Simulates a concurrent writer.
    pub fn seed(&self, record: MovieRecord) {
        if let Ok(mut state) = self.state.lock() {
            state.catalog.upsert(record);
        }
    }

    /// Configure the next operation to fail with the given error.
    pub fn set_next_error(&self, error: StorageError) {
        if let Ok(mut state) = self.state.lock() {
            state.next_error = Some(error);
        }
    }

    /// Get all recorded operations.
    pub fn recorded_ops(&self) -> Vec<RecordedStoreOp> {
        self.state
            .lock()
            .map(|state| state.ops.clone())
            .unwrap_or_default()
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().map(|state| state.closed).unwrap_or(true)
    }

    fn with_state<T>(
        &self,
        op: RecordedStoreOp,
        f: impl FnOnce(&mut Catalog) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StorageError::Unavailable("mock store lock poisoned".into()))?;
        state.ops.push(op);
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if state.closed {
            return Err(StorageError::Closed);
        }
        f(&mut state.catalog)
    }
}

impl MovieStore for MockStore {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn list(&self) -> Result<Catalog, StorageError> {
        self.with_state(RecordedStoreOp::List, |catalog| Ok(catalog.clone()))
    }

    fn insert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        self.with_state(RecordedStoreOp::Insert(record.title.clone()), |catalog| {
            if catalog.contains(&record.title) {
                return Err(StorageError::DuplicateTitle(record.title.clone()));
            }
            catalog.upsert(record.clone());
            Ok(())
        })
    }

    fn upsert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        self.with_state(RecordedStoreOp::Upsert(record.title.clone()), |catalog| {
            catalog.upsert(record.clone());
            Ok(())
        })
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StorageError> {
        self.with_state(
            RecordedStoreOp::UpdateRating(title.to_string(), rating),
            |catalog| match catalog.get_mut(title) {
                Some(record) => {
                    record.rating = rating;
                    Ok(())
                }
                None => Err(StorageError::NotFound(title.to_string())),
            },
        )
    }

    fn delete(&self, title: &str) -> Result<(), StorageError> {
        self.with_state(RecordedStoreOp::Delete(title.to_string()), |catalog| {
            catalog
                .remove(title)
                .map(|_| ())
                .ok_or_else(|| StorageError::NotFound(title.to_string()))
        })
    }

    fn close(&self) -> Result<(), StorageError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StorageError::Unavailable("mock store lock poisoned".into()))?;
        state.ops.push(RecordedStoreOp::Close);
        state.closed = true;
        Ok(())
    }
}
