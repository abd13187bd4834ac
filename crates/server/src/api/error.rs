//! Error-to-HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use cinelog_core::{AggregateError, CatalogError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// An error kind with its HTTP status, returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "invalid_request",
            message: message.into(),
        }
    }

    fn from_kind(kind: &'static str, message: String) -> Self {
        Self {
            status: status_for_kind(kind),
            kind,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// HTTP status for a core error kind.
pub fn status_for_kind(kind: &str) -> StatusCode {
    match kind {
        "not_found" | "not_found_remote" | "empty_catalog" => StatusCode::NOT_FOUND,
        "already_exists" | "duplicate_title" => StatusCode::CONFLICT,
        "validation" => StatusCode::UNPROCESSABLE_ENTITY,
        "transient" => StatusCode::BAD_GATEWAY,
        "storage_unavailable" | "resolver_not_configured" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl From<AggregateError> for ApiError {
    fn from(e: AggregateError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, kind = self.kind, "{}", self.message);
        } else {
            warn!(status = %self.status, kind = self.kind, "{}", self.message);
        }

        let body = ErrorResponse {
            error: self.message,
            kind: self.kind.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
