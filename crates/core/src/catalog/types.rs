use thiserror::Error;

use crate::record::ValidationError;
use crate::resolver::ResolverError;
use crate::storage::StorageError;

/// Errors returned by the catalog facade.
///
/// Every variant is recoverable; nothing here is retried internally.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid movie: {0}")]
    Validation(#[from] ValidationError),

    #[error("Movie not found: {0}")]
    NotFound(String),

    #[error("Movie already exists: {0}")]
    AlreadyExists(String),

    /// The store rejected a second record with the same title.
    #[error("Duplicate title in storage: {0}")]
    DuplicateTitle(String),

    #[error("No metadata found for {0}")]
    NotFoundRemote(String),

    #[error("Metadata lookup failed: {0}")]
    Transient(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Metadata resolver not configured: {0}")]
    ResolverNotConfigured(String),

    /// Malformed or closed store.
    #[error(transparent)]
    Storage(StorageError),
}

impl CatalogError {
    /// Stable snake_case identifier for hosts.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::AlreadyExists(_) => "already_exists",
            CatalogError::DuplicateTitle(_) => "duplicate_title",
            CatalogError::NotFoundRemote(_) => "not_found_remote",
            CatalogError::Transient(_) => "transient",
            CatalogError::StorageUnavailable(_) => "storage_unavailable",
            CatalogError::ResolverNotConfigured(_) => "resolver_not_configured",
            CatalogError::Storage(e) => e.kind(),
        }
    }
}

impl From<StorageError> for CatalogError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unavailable(msg) => CatalogError::StorageUnavailable(msg),
            StorageError::NotFound(title) => CatalogError::NotFound(title),
            StorageError::DuplicateTitle(title) => CatalogError::DuplicateTitle(title),
            other => CatalogError::Storage(other),
        }
    }
}

impl CatalogError {
    /// Map a resolver failure for the queried title.
    pub(crate) fn from_resolver(query: &str, e: ResolverError) -> Self {
        match e {
            ResolverError::NotFound(_) => CatalogError::NotFoundRemote(query.to_string()),
            ResolverError::Transient(msg) => CatalogError::Transient(msg),
            ResolverError::NotConfigured(msg) => CatalogError::ResolverNotConfigured(msg),
        }
    }
}
