//! Metadata lookup for partially specified movies.
//!
//! A resolver turns a bare title into a complete [`MovieRecord`] by asking
//! an external service. Each call is one fresh round trip: nothing is
//! cached and nothing is retried here.

mod omdb;

pub use omdb::{OmdbConfig, OmdbResolver};

use async_trait::async_trait;
use thiserror::Error;

use crate::record::MovieRecord;

/// Errors that can occur when resolving movie metadata.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The service does not know the title.
    #[error("No remote match for {0}")]
    NotFound(String),

    /// Network, timeout or protocol failure. Safe to retry later.
    #[error("Metadata lookup failed: {0}")]
    Transient(String),

    /// Client not configured (missing API key, etc.).
    #[error("Resolver not configured: {0}")]
    NotConfigured(String),
}

impl ResolverError {
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::NotFound(_) => "not_found",
            ResolverError::Transient(_) => "transient",
            ResolverError::NotConfigured(_) => "not_configured",
        }
    }
}

impl From<reqwest::Error> for ResolverError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ResolverError::Transient(format!("request timed out: {}", e))
        } else {
            ResolverError::Transient(e.to_string())
        }
    }
}

/// Trait for metadata resolvers.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Look up `title` and return the service's record for it.
    ///
    /// The returned title is the service's canonical spelling and may
    /// differ from the query.
    async fn resolve(&self, title: &str) -> Result<MovieRecord, ResolverError>;
}
