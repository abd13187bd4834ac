pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod record;
pub mod resolver;
pub mod storage;
pub mod testing;

pub use aggregate::{
    filter, random_pick, rating_histogram, search, sort_by_rating, sort_by_year, stats,
    AggregateError, HistogramBin, MovieFilter, MovieSummary, RatingStats,
};
pub use catalog::{CatalogError, MovieCatalog};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    SanitizedConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use record::{Catalog, MovieRecord, ValidationError, ValidationMode};
pub use resolver::{MetadataResolver, OmdbConfig, OmdbResolver, ResolverError};
pub use storage::{
    copy_catalog, open_store, DocumentSchema, DocumentStore, MovieStore, RelationalStore,
    StorageError,
};
