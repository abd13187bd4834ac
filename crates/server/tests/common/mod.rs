//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! over a temporary SQLite store, with a mock metadata resolver injected.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cinelog_core::{
    testing::MockResolver, Config, MetadataResolver, MovieCatalog, MovieStore, RelationalStore,
    ServerConfig, StorageBackend, StorageConfig, ValidationMode,
};
use cinelog_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use cinelog_core::testing::fixtures;

/// Test fixture for API testing with a mock resolver.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_by_title() {
///     let fixture = TestFixture::new().await;
///     fixture.resolver.add_movie(fixtures::movie("Heat", 1995, 8.3)).await;
///
///     let response = fixture.post("/api/v1/movies", json!({ "title": "heat" })).await;
///     assert_eq!(response.status, StatusCode::CREATED);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock resolver - configure lookup results
    pub resolver: Arc<MockResolver>,
    /// The catalog behind the router
    pub catalog: Arc<MovieCatalog>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Leave the catalog without a metadata resolver
    pub without_resolver: bool,
    /// Validation mode for the catalog
    pub validation: ValidationMode,
}

impl TestConfig {
    pub fn without_resolver() -> Self {
        Self {
            without_resolver: true,
            ..Default::default()
        }
    }

    pub fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("movies.db");

        let config = Config {
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                path: Some(db_path.clone()),
                ..Default::default()
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            ..Default::default()
        };

        let store: Arc<dyn MovieStore> =
            Arc::new(RelationalStore::open(&db_path).expect("Failed to create movie store"));
        let resolver = Arc::new(MockResolver::new());

        let mut catalog = MovieCatalog::new(store).with_validation(test_config.validation);
        if !test_config.without_resolver {
            catalog = catalog.with_resolver(Arc::clone(&resolver) as Arc<dyn MetadataResolver>);
        }
        let catalog = Arc::new(catalog);

        let state = Arc::new(AppState::new(config, Arc::clone(&catalog)));
        let router = create_router(state);

        Self {
            router,
            resolver,
            catalog,
            temp_dir,
        }
    }

    /// Add records straight through the API, asserting each is created.
    pub async fn seed(&self, entries: &[(&str, i32, f64)]) {
        for (title, year, rating) in entries {
            let response = self
                .post(
                    "/api/v1/movies",
                    serde_json::json!({ "title": title, "year": year, "rating": rating }),
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED, "seeding {}", title);
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PATCH request with JSON body.
    pub async fn patch(&self, path: &str, body: Value) -> TestResponse {
        self.request("PATCH", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a path and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
