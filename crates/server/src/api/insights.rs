//! Read-only aggregate views over the catalog.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use cinelog_core::{aggregate, HistogramBin, MovieFilter, MovieRecord, MovieSummary, RatingStats};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::movies::MovieListResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Rating,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    #[serde(default)]
    pub by: SortKey,
    #[serde(default)]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Serialize)]
pub struct SummaryListResponse {
    pub movies: Vec<MovieSummary>,
    pub total: usize,
}

impl From<Vec<MovieSummary>> for SummaryListResponse {
    fn from(movies: Vec<MovieSummary>) -> Self {
        let total = movies.len();
        Self { movies, total }
    }
}

#[derive(Debug, Serialize)]
pub struct HistogramResponse {
    pub bins: Vec<HistogramBin>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/insights/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<RatingStats>, ApiError> {
    let movies = state.catalog().list_movies()?;
    Ok(Json(aggregate::stats(&movies)?))
}

/// GET /api/v1/insights/random
pub async fn random(State(state): State<Arc<AppState>>) -> Result<Json<MovieRecord>, ApiError> {
    let movies = state.catalog().list_movies()?;
    let pick = aggregate::random_pick(&movies, &mut rand::thread_rng())?.clone();
    Ok(Json(pick))
}

/// GET /api/v1/insights/search?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SummaryListResponse>, ApiError> {
    let movies = state.catalog().list_movies()?;
    Ok(Json(aggregate::search(&movies, &params.q).into()))
}

/// GET /api/v1/insights/sorted?by=rating|year&order=asc|desc
///
/// Rating order is always highest first. Year order defaults to latest
/// first.
pub async fn sorted(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortParams>,
) -> Result<Json<SummaryListResponse>, ApiError> {
    let movies = state.catalog().list_movies()?;

    let sorted = match (params.by, params.order) {
        (SortKey::Rating, Some(SortOrder::Asc)) => {
            return Err(ApiError::bad_request(
                "rating order is always descending",
            ))
        }
        (SortKey::Rating, _) => aggregate::sort_by_rating(&movies),
        (SortKey::Year, order) => {
            aggregate::sort_by_year(&movies, order != Some(SortOrder::Asc))
        }
    };
    Ok(Json(sorted.into()))
}

/// GET /api/v1/insights/filter?min_rating=&start_year=&end_year=
pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MovieFilter>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let movies = state.catalog().list_movies()?;
    let matched = aggregate::filter(&movies, &filter).into_records();
    let total = matched.len();
    Ok(Json(MovieListResponse {
        movies: matched,
        total,
    }))
}

/// GET /api/v1/insights/histogram
pub async fn histogram(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistogramResponse>, ApiError> {
    let movies = state.catalog().list_movies()?;
    let bins = aggregate::rating_histogram(&movies);
    let total = bins.iter().map(|b| b.count).sum();
    Ok(Json(HistogramResponse { bins, total }))
}
