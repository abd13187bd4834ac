use std::sync::Arc;

use cinelog_core::{Config, MovieCatalog, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<MovieCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<MovieCatalog>) -> Self {
        Self { config, catalog }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &MovieCatalog {
        self.catalog.as_ref()
    }
}
