//! Movie CRUD handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cinelog_core::{CatalogError, DocumentSchema, DocumentStore, MovieRecord};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Body of `POST /movies`.
///
/// With both `year` and `rating` the record is stored as given. With
/// neither, the rest comes from the metadata resolver. Anything in between
/// is rejected.
#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub poster: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub path: PathBuf,
    #[serde(default)]
    pub document_schema: DocumentSchema,
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let movies = state.catalog().list_movies()?.into_records();
    let total = movies.len();
    Ok(Json(MovieListResponse { movies, total }))
}

/// POST /api/v1/movies
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddMovieRequest>,
) -> Result<(StatusCode, Json<MovieRecord>), ApiError> {
    let catalog = state.catalog();

    let record = match (request.year, request.rating) {
        (Some(year), Some(rating)) => catalog.add_record(MovieRecord {
            title: request.title,
            year,
            rating,
            poster: request.poster.unwrap_or_default(),
        })?,
        (None, None) if request.poster.is_none() => catalog.add_movie(&request.title).await?,
        _ => {
            return Err(ApiError::bad_request(
                "year and rating must be given together, or only the title",
            ))
        }
    };

    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/v1/movies/{title}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Json(request): Json<UpdateMovieRequest>,
) -> Result<Json<MovieRecord>, ApiError> {
    let catalog = state.catalog();
    catalog.update_movie(&title, request.rating)?;

    let record = catalog
        .list_movies()?
        .remove(&title)
        .ok_or(CatalogError::NotFound(title))?;
    Ok(Json(record))
}

/// DELETE /api/v1/movies/{title}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog().delete_movie(&title)?;
    Ok(Json(SuccessResponse {
        message: format!("Deleted {}", title),
    }))
}

/// POST /api/v1/import
///
/// Copy a JSON document store on the server's filesystem into the active
/// store.
pub async fn import_document(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    if !request.path.is_file() {
        return Err(ApiError::bad_request(format!(
            "No document at {}",
            request.path.display()
        )));
    }

    let source = DocumentStore::open(&request.path, request.document_schema)
        .map_err(CatalogError::from)?;
    let imported = state.catalog().import_from(&source)?;
    Ok(Json(ImportResponse { imported }))
}
