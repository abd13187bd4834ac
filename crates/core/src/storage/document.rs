//! JSON document movie store.
//!
//! The whole catalog is one JSON object keyed by title. Every call reads
//! the full document, mutates it in memory and writes it back. A mutex
//! per store instance serializes those cycles within the process; separate
//! processes sharing the file still race (last writer wins).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::info;

use super::{observed, MovieStore, StorageError};
use crate::record::{Catalog, MovieRecord};

const BACKEND: &str = "json";

/// Which fields the document store writes for each movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSchema {
    /// `{year, rating}` only; posters are dropped on write.
    #[default]
    Legacy,
    /// `{year, rating, poster}`.
    Extended,
}

/// One value of the top-level document object.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentEntry {
    year: i32,
    rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poster: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreState {
    Open,
    Closed,
}

/// JSON-file-backed movie store.
pub struct DocumentStore {
    path: PathBuf,
    schema: DocumentSchema,
    state: Mutex<StoreState>,
}

impl DocumentStore {
    /// Open the document at `path`, creating an empty one if it is missing.
    pub fn open(path: &Path, schema: DocumentSchema) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!("{}: {}", parent.display(), e))
            })?;
        }

        let store = Self {
            path: path.to_path_buf(),
            schema,
            state: Mutex::new(StoreState::Open),
        };

        if !path.exists() {
            info!(
                "Document store not found at {}, creating an empty one",
                path.display()
            );
            store.write(&Catalog::new())?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> DocumentSchema {
        self.schema
    }

    /// Acquire the single-writer lock, failing if the store was closed.
    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StorageError::Unavailable("document store lock poisoned".to_string()))?;
        if *guard == StoreState::Closed {
            return Err(StorageError::Closed);
        }
        Ok(guard)
    }

    fn read(&self) -> Result<Catalog, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Removed behind our back; recreate like a first access.
                self.write(&Catalog::new())?;
                return Ok(Catalog::new());
            }
            Err(e) => {
                return Err(StorageError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Catalog::new());
        }

        let document: Map<String, Value> = serde_json::from_str(&content)
            .map_err(|e| StorageError::Malformed(format!("{}: {}", self.path.display(), e)))?;

        let mut catalog = Catalog::new();
        for (title, value) in document {
            let entry: DocumentEntry = serde_json::from_value(value)
                .map_err(|e| StorageError::Malformed(format!("entry {:?}: {}", title, e)))?;
            catalog.upsert(MovieRecord {
                title,
                year: entry.year,
                rating: entry.rating,
                poster: entry.poster.unwrap_or_default(),
            });
        }
        Ok(catalog)
    }

    /// Replace the document atomically: write a sibling temp file, then rename.
    fn write(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let mut document = Map::new();
        for record in catalog.iter() {
            if !record.rating.is_finite() {
                return Err(StorageError::Malformed(format!(
                    "rating of {:?} is not a finite number",
                    record.title
                )));
            }
            let entry = DocumentEntry {
                year: record.year,
                rating: record.rating,
                poster: match self.schema {
                    DocumentSchema::Legacy => None,
                    DocumentSchema::Extended => Some(record.poster.clone()),
                },
            };
            let value = serde_json::to_value(entry)
                .map_err(|e| StorageError::Malformed(e.to_string()))?;
            document.insert(record.title.clone(), value);
        }

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let unavailable = |e: std::io::Error| {
            StorageError::Unavailable(format!("{}: {}", self.path.display(), e))
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(unavailable)?;
        tmp.write_all(json.as_bytes()).map_err(unavailable)?;
        tmp.as_file().sync_all().map_err(unavailable)?;
        tmp.persist(&self.path).map_err(|e| unavailable(e.error))?;
        Ok(())
    }
}

impl MovieStore for DocumentStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn list(&self) -> Result<Catalog, StorageError> {
        let result = self.lock().and_then(|_guard| self.read());
        observed(BACKEND, "list", result)
    }

    fn insert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        let result = self.lock().and_then(|_guard| {
            let mut catalog = self.read()?;
            if catalog.contains(&record.title) {
                return Err(StorageError::DuplicateTitle(record.title.clone()));
            }
            catalog.upsert(record.clone());
            self.write(&catalog)
        });
        observed(BACKEND, "insert", result)
    }

    fn upsert(&self, record: &MovieRecord) -> Result<(), StorageError> {
        let result = self.lock().and_then(|_guard| {
            let mut catalog = self.read()?;
            catalog.upsert(record.clone());
            self.write(&catalog)
        });
        observed(BACKEND, "upsert", result)
    }

    fn upsert_all(&self, records: &[MovieRecord]) -> Result<usize, StorageError> {
        let result = self.lock().and_then(|_guard| {
            let mut catalog = self.read()?;
            for record in records {
                catalog.upsert(record.clone());
            }
            self.write(&catalog)?;
            Ok(records.len())
        });
        observed(BACKEND, "upsert_all", result)
    }

    fn update_rating(&self, title: &str, rating: f64) -> Result<(), StorageError> {
        let result = self.lock().and_then(|_guard| {
            let mut catalog = self.read()?;
            match catalog.get_mut(title) {
                Some(record) => record.rating = rating,
                None => return Err(StorageError::NotFound(title.to_string())),
            }
            self.write(&catalog)
        });
        observed(BACKEND, "update_rating", result)
    }

    fn delete(&self, title: &str) -> Result<(), StorageError> {
        let result = self.lock().and_then(|_guard| {
            let mut catalog = self.read()?;
            if catalog.remove(title).is_none() {
                return Err(StorageError::NotFound(title.to_string()));
            }
            self.write(&catalog)
        });
        observed(BACKEND, "delete", result)
    }

    fn close(&self) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        *guard = StoreState::Closed;
        info!("Closed document store at {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_store(schema: DocumentSchema) -> (DocumentStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(&dir.path().join("data/data.json"), schema).unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_creates_empty_document() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        assert_eq!(store.schema(), DocumentSchema::Legacy);
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "{}");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_round_trip_legacy_drops_poster() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        let mut record = fixtures::movie("Titanic", 1997, 7.9);
        record.poster = "http://img/titanic.jpg".to_string();
        store.upsert(&record).unwrap();

        let catalog = store.list().unwrap();
        assert_eq!(catalog.len(), 1);
        let stored = catalog.get("Titanic").unwrap();
        assert_eq!(stored.year, 1997);
        assert_eq!(stored.rating, 7.9);
        assert_eq!(stored.poster, "");

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("poster"));
    }

    #[test]
    fn test_upsert_round_trip_extended_keeps_poster() {
        let (store, _dir) = create_test_store(DocumentSchema::Extended);
        let mut record = fixtures::movie("Titanic", 1997, 7.9);
        record.poster = "http://img/titanic.jpg".to_string();
        store.upsert(&record).unwrap();

        let stored = store.list().unwrap();
        assert_eq!(stored.get("Titanic").unwrap(), &record);
    }

    #[test]
    fn test_upsert_overwrites_blindly() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        store.upsert(&fixtures::movie("Heat", 1995, 8.0)).unwrap();
        store.upsert(&fixtures::movie("Heat", 1996, 3.0)).unwrap();

        let catalog = store.list().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Heat").unwrap().year, 1996);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        store.insert(&fixtures::movie("Heat", 1995, 8.0)).unwrap();
        let result = store.insert(&fixtures::movie("Heat", 1995, 2.0));
        assert!(matches!(result, Err(StorageError::DuplicateTitle(_))));
        assert_eq!(store.list().unwrap().get("Heat").unwrap().rating, 8.0);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        for title in ["Zodiac", "Alien", "Memento"] {
            store.insert(&fixtures::movie(title, 2000, 7.0)).unwrap();
        }
        store.update_rating("Alien", 9.0).unwrap();
        assert_eq!(
            store.list().unwrap().titles(),
            vec!["Zodiac", "Alien", "Memento"]
        );
    }

    #[test]
    fn test_update_and_delete_missing_title() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        assert!(matches!(
            store.update_rating("Nope", 5.0),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(store.delete("Nope"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_reads_legacy_python_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{
    "Titanic": {
        "rating": 9,
        "year": 1999
    },
    "In the Mood for Love": {
        "rating": 8.1,
        "year": 2000
    }
}"#,
        )
        .unwrap();

        let store = DocumentStore::open(&path, DocumentSchema::Legacy).unwrap();
        let catalog = store.list().unwrap();
        assert_eq!(catalog.titles(), vec!["Titanic", "In the Mood for Love"]);
        assert_eq!(catalog.get("Titanic").unwrap().rating, 9.0);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"Heat": {"year": 1995, "rating": 8, "director": "Mann"}}"#).unwrap();

        let store = DocumentStore::open(&path, DocumentSchema::Legacy).unwrap();
        assert!(matches!(store.list(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"Heat": {"year": 1995}}"#).unwrap();

        let store = DocumentStore::open(&path, DocumentSchema::Legacy).unwrap();
        assert!(matches!(store.list(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn test_non_finite_rating_is_rejected_before_writing() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        store.insert(&fixtures::movie("Heat", 1995, 8.0)).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let result = store.upsert(&fixtures::movie("Broken", 2000, f64::NAN));
        assert!(matches!(result, Err(StorageError::Malformed(_))));

        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_rename_leaves_target_and_no_temp_files() {
        let (store, dir) = create_test_store(DocumentSchema::Legacy);
        store.insert(&fixtures::movie("Heat", 1995, 8.0)).unwrap();

        // A non-empty directory at the target path makes the final rename fail.
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep"), "previous").unwrap();

        let catalog = Catalog::from_records(vec![fixtures::movie("Ronin", 1998, 7.2)]);
        let result = store.write(&catalog);
        assert!(matches!(result, Err(StorageError::Unavailable(_))));

        assert_eq!(
            fs::read_to_string(store.path().join("keep")).unwrap(),
            "previous"
        );
        let entries: Vec<_> = fs::read_dir(dir.path().join("data"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
    }

    #[test]
    fn test_upsert_all_is_one_write() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        store.insert(&fixtures::movie("Heat", 1995, 1.0)).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let broken = [
            fixtures::movie("Heat", 1995, 8.3),
            fixtures::movie("Broken", 2000, f64::INFINITY),
        ];
        assert!(store.upsert_all(&broken).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);

        let batch = [
            fixtures::movie("Heat", 1995, 8.3),
            fixtures::movie("Ronin", 1998, 7.2),
        ];
        assert_eq!(store.upsert_all(&batch).unwrap(), 2);
        let catalog = store.list().unwrap();
        assert_eq!(catalog.titles(), vec!["Heat", "Ronin"]);
        assert_eq!(catalog.get("Heat").unwrap().rating, 8.3);
    }

    #[test]
    fn test_recreates_deleted_document() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        fs::remove_file(store.path()).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_closed_store_rejects_calls() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        store.close().unwrap();
        assert!(matches!(store.list(), Err(StorageError::Closed)));
        assert!(matches!(
            store.insert(&fixtures::movie("Heat", 1995, 8.0)),
            Err(StorageError::Closed)
        ));
    }

    #[test]
    fn test_concurrent_inserts_are_serialized() {
        let (store, _dir) = create_test_store(DocumentSchema::Legacy);
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .insert(&fixtures::movie(&format!("Movie {}", i), 2000 + i, 5.0))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list().unwrap().len(), 8);
    }
}
