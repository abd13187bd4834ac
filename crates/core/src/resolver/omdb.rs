//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key for access. A lookup is a single GET with the
//! key and the title as query parameters; the JSON body carries
//! `"Response": "False"` when the title is unknown, whatever the HTTP
//! status says.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MetadataResolver, ResolverError};
use crate::metrics;
use crate::record::{parse_year, MovieRecord};

const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";
const NOT_AVAILABLE: &str = "N/A";

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required for lookups).
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OmdbConfig {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// OMDb API client.
pub struct OmdbResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbResolver {
    /// Create a new OMDb client with the configured request timeout.
    pub fn new(config: OmdbConfig) -> Result<Self, ResolverError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(client, config)
    }

    /// Create a client around a preconfigured HTTP client.
    pub fn with_client(client: Client, config: OmdbConfig) -> Result<Self, ResolverError> {
        if !config.is_configured() {
            return Err(ResolverError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            api_key: config.api_key,
        })
    }

    async fn lookup(&self, title: &str) -> Result<MovieRecord, ResolverError> {
        debug!("OMDb lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: OmdbResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(ResolverError::Transient(format!(
                    "Failed to parse OMDb response: {}",
                    e
                )))
            }
            Err(_) => {
                return Err(ResolverError::Transient(format!(
                    "OMDb returned HTTP {}",
                    status.as_u16()
                )))
            }
        };

        if parsed.response.eq_ignore_ascii_case("false") {
            let message = parsed
                .error
                .unwrap_or_else(|| format!("{} not found", title));
            return Err(ResolverError::NotFound(message));
        }

        parsed.into_record()
    }
}

#[async_trait]
impl MetadataResolver for OmdbResolver {
    async fn resolve(&self, title: &str) -> Result<MovieRecord, ResolverError> {
        let started = Instant::now();
        let result = self.lookup(title).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(record) => {
                metrics::record_lookup("found", elapsed);
                debug!("OMDb resolved '{}' as '{}'", title, record.title);
            }
            Err(e) => {
                metrics::record_lookup(e.kind(), elapsed);
                if matches!(e, ResolverError::Transient(_)) {
                    warn!("OMDb lookup for '{}' failed: {}", title, e);
                }
            }
        }
        result
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

// ============================================================================
// Conversions
// ============================================================================

impl OmdbResponse {
    fn into_record(self) -> Result<MovieRecord, ResolverError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ResolverError::Transient("OMDb response has no Title".to_string()))?;

        let year_text = self.year.unwrap_or_default();
        let year = parse_year(&year_text).map_err(|_| {
            ResolverError::Transient(format!("OMDb returned unusable Year {:?}", year_text))
        })?;

        let rating = match self.imdb_rating.as_deref().map(str::trim) {
            None | Some("") | Some(NOT_AVAILABLE) => 0.0,
            Some(text) => text.parse::<f64>().map_err(|_| {
                ResolverError::Transient(format!("OMDb returned unusable imdbRating {:?}", text))
            })?,
        };

        let poster = match self.poster {
            Some(p) if p != NOT_AVAILABLE => p,
            _ => String::new(),
        };

        Ok(MovieRecord {
            title,
            year,
            rating,
            poster,
        })
    }
}
