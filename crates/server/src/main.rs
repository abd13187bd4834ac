use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinelog_core::{
    load_config, open_store, validate_config, MovieCatalog, MovieStore, OmdbResolver,
};
use cinelog_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("CINELOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Storage backend: {:?}", config.storage.backend);
    info!("Storage path: {:?}", config.storage.resolved_path());
    info!("Validation mode: {:?}", config.catalog.validation);

    // Open the movie store
    let store: Arc<dyn MovieStore> =
        Arc::from(open_store(&config.storage).context("Failed to open movie store")?);

    let mut catalog = MovieCatalog::new(store).with_validation(config.catalog.validation);

    // Metadata resolver is optional: without a key, only fully specified adds work
    if config.resolver.is_configured() {
        match OmdbResolver::new(config.resolver.clone()) {
            Ok(resolver) => {
                info!("Initializing OMDb resolver at {}", config.resolver.base_url());
                catalog = catalog.with_resolver(Arc::new(resolver));
            }
            Err(e) => error!("Failed to create OMDb resolver: {}", e),
        }
    } else {
        warn!("OMDb API key not configured; adding movies by title is disabled");
    }

    let catalog = Arc::new(catalog);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&catalog)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    catalog.close().context("Failed to close movie store")?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
