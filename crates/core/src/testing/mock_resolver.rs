//! Mock metadata resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::record::MovieRecord;
use crate::resolver::{MetadataResolver, ResolverError};

/// Mock implementation of the MetadataResolver trait.
///
/// Lookups are case-insensitive on the query. Provides controllable
/// behavior for testing:
/// - Return configurable records, including canonical titles that differ
///   from the query
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use cinelog_core::testing::{MockResolver, fixtures};
///
/// let resolver = MockResolver::new();
/// resolver.add_movie(fixtures::movie("Heat", 1995, 8.3)).await;
///
/// let record = resolver.resolve("heat").await?;
/// assert_eq!(record.title, "Heat");
/// ```
#[derive(Debug)]
pub struct MockResolver {
    /// Known records by lowercased query.
    movies: Arc<RwLock<HashMap<String, MovieRecord>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<ResolverError>>>,
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResolver {
    /// Create a resolver that knows no titles.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Make a record resolvable by its own title.
    pub async fn add_movie(&self, record: MovieRecord) {
        self.movies
            .write()
            .await
            .insert(record.title.to_lowercase(), record);
    }

    /// Make `query` resolve to `record`, whose title may differ.
    pub async fn add_alias(&self, query: &str, record: MovieRecord) {
        self.movies.write().await.insert(query.to_lowercase(), record);
    }

    /// Forget every known record.
    pub async fn clear_movies(&self) {
        self.movies.write().await.clear();
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of lookups performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: ResolverError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }
}

#[async_trait]
impl MetadataResolver for MockResolver {
    async fn resolve(&self, title: &str) -> Result<MovieRecord, ResolverError> {
        self.queries.write().await.push(title.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.movies
            .read()
            .await
            .get(&title.to_lowercase())
            .cloned()
            .ok_or_else(|| ResolverError::NotFound("Movie not found!".to_string()))
    }
}
