//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Catalog Error Enum ==
/// Unified error type for catalog retrieval and the HTTP surface.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Network failure or client-side timeout while talking to an upstream
    #[error("Upstream request failed: {0}")]
    Fetch(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Upstream body or pagination headers could not be understood
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// Persisted session entry is corrupt or unreadable
    #[error("Session cache read failed: {0}")]
    CacheRead(String),

    /// Persisting a refreshed catalog failed
    #[error("Session cache write failed: {0}")]
    CacheWrite(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// True for the failures that make up a catalog fetch error: network,
    /// HTTP status and malformed responses.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Fetch(_) | CatalogError::UpstreamStatus { .. } | CatalogError::Malformed(_)
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Fetch(format!("request timed out: {}", err))
        } else if err.is_decode() {
            CatalogError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::UpstreamStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            CatalogError::Fetch(err.to_string())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Fetch(_)
            | CatalogError::UpstreamStatus { .. }
            | CatalogError::Malformed(_) => StatusCode::BAD_GATEWAY,
            CatalogError::CacheRead(_) | CatalogError::CacheWrite(_) | CatalogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;
