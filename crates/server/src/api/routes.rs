use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, insights, middleware::metrics_middleware, movies};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Movies
        .route("/movies", get(movies::list_movies).post(movies::add_movie))
        .route(
            "/movies/{title}",
            patch(movies::update_movie).delete(movies::delete_movie),
        )
        .route("/import", post(movies::import_document))
        // Insights (read-only aggregation)
        .route("/insights/stats", get(insights::stats))
        .route("/insights/random", get(insights::random))
        .route("/insights/search", get(insights::search))
        .route("/insights/sorted", get(insights::sorted))
        .route("/insights/filter", get(insights::filter))
        .route("/insights/histogram", get(insights::histogram));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
