//! Catalog facade.
//!
//! [`MovieCatalog`] is the only mutation path into a store. It owns the
//! storage backend and, optionally, a metadata resolver for adds that give
//! nothing but a title.

mod types;

pub use types::CatalogError;

use std::sync::Arc;

use tracing::{info, warn};

use crate::metrics;
use crate::record::{check_rating, check_title, Catalog, MovieRecord, ValidationMode};
use crate::resolver::MetadataResolver;
use crate::storage::{MovieStore, StorageError};

/// CRUD API over a movie store.
pub struct MovieCatalog {
    store: Arc<dyn MovieStore>,
    resolver: Option<Arc<dyn MetadataResolver>>,
    validation: ValidationMode,
}

impl MovieCatalog {
    /// Create a catalog over `store`, with no resolver and lenient validation.
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self {
            store,
            resolver: None,
            validation: ValidationMode::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn MetadataResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Load the whole catalog from the store.
    pub fn list_movies(&self) -> Result<Catalog, CatalogError> {
        Ok(self.store.list()?)
    }

    /// Add a movie known only by title, completing it through the resolver.
    ///
    /// The stored record carries the resolver's canonical title. Nothing is
    /// written when the lookup fails.
    pub async fn add_movie(&self, title: &str) -> Result<MovieRecord, CatalogError> {
        let result = self.try_add_movie(title).await;
        metrics::record_mutation("add", outcome(&result));
        result
    }

    async fn try_add_movie(&self, title: &str) -> Result<MovieRecord, CatalogError> {
        check_title(title)?;

        // Titles are exact keys: "Heat " and "Heat" are different movies.
        if self.store.list()?.contains(title) {
            return Err(CatalogError::AlreadyExists(title.to_string()));
        }

        let resolver = self.resolver.as_ref().ok_or_else(|| {
            CatalogError::ResolverNotConfigured("no metadata resolver available".to_string())
        })?;

        let query = title.trim();
        let record = resolver
            .resolve(query)
            .await
            .map_err(|e| CatalogError::from_resolver(query, e))?;

        if self.validation.is_strict() {
            record.validate()?;
        }

        self.insert(&record)?;
        info!(
            "Added movie '{}' ({}) with rating {} (query '{}')",
            record.title, record.year, record.rating, query
        );
        Ok(record)
    }

    /// Add a fully specified record without a resolver round trip.
    pub fn add_record(&self, record: MovieRecord) -> Result<MovieRecord, CatalogError> {
        let result = self.try_add_record(record);
        metrics::record_mutation("add", outcome(&result));
        result
    }

    fn try_add_record(&self, record: MovieRecord) -> Result<MovieRecord, CatalogError> {
        check_title(&record.title)?;
        if self.validation.is_strict() {
            record.validate()?;
        }

        if self.store.list()?.contains(&record.title) {
            return Err(CatalogError::AlreadyExists(record.title));
        }

        self.insert(&record)?;
        info!(
            "Added movie '{}' ({}) with rating {}",
            record.title, record.year, record.rating
        );
        Ok(record)
    }

    fn insert(&self, record: &MovieRecord) -> Result<(), CatalogError> {
        self.store.insert(record).map_err(|e| {
            if let StorageError::DuplicateTitle(title) = &e {
                warn!("Store already holds '{}', add rejected", title);
            }
            CatalogError::from(e)
        })
    }

    /// Remove a movie by exact title.
    pub fn delete_movie(&self, title: &str) -> Result<(), CatalogError> {
        let result = self.store.delete(title).map_err(CatalogError::from);
        metrics::record_mutation("delete", outcome(&result));
        if result.is_ok() {
            info!("Deleted movie '{}'", title);
        }
        result
    }

    /// Change the rating of an existing movie.
    ///
    /// The rating is always range-checked, whatever the validation mode.
    pub fn update_movie(&self, title: &str, rating: f64) -> Result<(), CatalogError> {
        let result = self.try_update_movie(title, rating);
        metrics::record_mutation("update", outcome(&result));
        result
    }

    fn try_update_movie(&self, title: &str, rating: f64) -> Result<(), CatalogError> {
        if let Err(e) = check_rating(rating) {
            // An absent title wins over a bad rating.
            if !self.store.list()?.contains(title) {
                return Err(CatalogError::NotFound(title.to_string()));
            }
            return Err(e.into());
        }

        self.store.update_rating(title, rating)?;
        info!("Updated rating of '{}' to {}", title, rating);
        Ok(())
    }

    /// Copy every record of `source` into this catalog's store.
    ///
    /// Titles already present are overwritten. The source is read once; in
    /// strict mode that snapshot is validated before anything is written.
    /// The relational backend applies the batch in one transaction.
    pub fn import_from(&self, source: &dyn MovieStore) -> Result<usize, CatalogError> {
        let result = self.try_import_from(source);
        metrics::record_mutation("import", outcome(&result));
        result
    }

    fn try_import_from(&self, source: &dyn MovieStore) -> Result<usize, CatalogError> {
        let snapshot = source.list()?;
        if self.validation.is_strict() {
            for record in snapshot.iter() {
                record.validate()?;
            }
        }

        let copied = self.store.upsert_all(snapshot.records())?;
        info!(
            "Imported {} movies from {} store",
            copied,
            source.backend_name()
        );
        Ok(copied)
    }

    /// Close the underlying store.
    pub fn close(&self) -> Result<(), CatalogError> {
        self.store.close()?;
        info!("Closed {} movie store", self.store.backend_name());
        Ok(())
    }
}

fn outcome<T>(result: &Result<T, CatalogError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}
