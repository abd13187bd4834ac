use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::record::ValidationMode;
use crate::resolver::OmdbConfig;
use crate::storage::DocumentSchema;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub resolver: OmdbConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Available storage backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Whole-catalog JSON document.
    Json,
    /// SQLite table with one row per movie.
    #[default]
    Sqlite,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// File path of the store (default depends on the backend).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Field layout for the JSON backend.
    #[serde(default)]
    pub document_schema: DocumentSchema,
}

impl StorageConfig {
    /// The configured path, or the project-local default for the backend.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match self.backend {
            StorageBackend::Json => PathBuf::from("data/data.json"),
            StorageBackend::Sqlite => PathBuf::from("data/movies.db"),
        })
    }
}

/// Catalog behaviour configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub validation: ValidationMode,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub storage: SanitizedStorageConfig,
    pub resolver: SanitizedResolverConfig,
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
    pub document_schema: DocumentSchema,
}

/// Sanitized resolver config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedResolverConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            storage: SanitizedStorageConfig {
                backend: config.storage.backend,
                path: config.storage.resolved_path(),
                document_schema: config.storage.document_schema,
            },
            resolver: SanitizedResolverConfig {
                base_url: config.resolver.base_url().to_string(),
                api_key_configured: config.resolver.is_configured(),
                timeout_secs: config.resolver.timeout_secs,
            },
            catalog: config.catalog.clone(),
            server: config.server.clone(),
        }
    }
}
