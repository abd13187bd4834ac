//! Testing utilities and mock implementations.
//!
//! Mocks for the resolver and storage traits, so the catalog facade and
//! hosts can be exercised without network access or files on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cinelog_core::testing::{fixtures, MockResolver, MockStore};
//! use cinelog_core::MovieCatalog;
//!
//! let resolver = Arc::new(MockResolver::new());
//! resolver.add_movie(fixtures::movie("Heat", 1995, 8.3)).await;
//!
//! let catalog = MovieCatalog::new(Arc::new(MockStore::new())).with_resolver(resolver);
//! catalog.add_movie("heat").await?;
//! ```

mod mock_resolver;
mod mock_store;

pub use mock_resolver::MockResolver;
pub use mock_store::{MockStore, RecordedStoreOp};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::record::{Catalog, MovieRecord};

    /// Create a movie record without a poster.
    pub fn movie(title: &str, year: i32, rating: f64) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            year,
            rating,
            poster: String::new(),
        }
    }

    /// Create a movie record with a poster URL derived from the title.
    pub fn movie_with_poster(title: &str, year: i32, rating: f64) -> MovieRecord {
        MovieRecord {
            poster: format!(
                "https://img.example.com/{}.jpg",
                title.to_lowercase().replace(' ', "-")
            ),
            ..movie(title, year, rating)
        }
    }

    /// Build a catalog from `(title, year, rating)` triples, in order.
    pub fn catalog(entries: &[(&str, i32, f64)]) -> Catalog {
        entries
            .iter()
            .map(|(title, year, rating)| movie(title, *year, *rating))
            .collect()
    }

    /// Seven well-known movies; two share the year 1994.
    pub fn sample_catalog() -> Catalog {
        catalog(&[
            ("The Shawshank Redemption", 1994, 9.3),
            ("The Godfather", 1972, 9.2),
            ("Pulp Fiction", 1994, 8.9),
            ("The Dark Knight", 2008, 9.0),
            ("Inception", 2010, 8.8),
            ("Jurassic World", 2015, 7.0),
            ("Cats", 2019, 2.8),
        ])
    }
}
