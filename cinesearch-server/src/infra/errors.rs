use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cinesearch_core::CatalogError;
use serde_json::json;
use std::{fmt, sync::Arc};

pub type AppResult<T> = Result<T, AppError>;

/// Failure returned by a proxy route as `{ "error": message }`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        catalog_failure(&err)
    }
}

/// A failure shared between requests, e.g. by the genre cache.
impl From<Arc<CatalogError>> for AppError {
    fn from(err: Arc<CatalogError>) -> Self {
        catalog_failure(&err)
    }
}

fn catalog_failure(err: &CatalogError) -> AppError {
    tracing::error!(error = %err, "catalog request failed");
    AppError::internal(err.to_string())
}
