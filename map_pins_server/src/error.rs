//! API error types with HTTP status code mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Query string could not be parsed.
    #[error("Invalid parameters provided")]
    InvalidParameters(String),

    /// Zoom parsed but outside the configured range.
    #[error("Zoom must be between {min} and {max}")]
    ZoomOutOfRange { min: u8, max: u8 },

    /// The clustering core failed or its worker task died.
    #[error("An error occurred during clustering")]
    Clustering(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameters(_) | ApiError::ZoomOutOfRange { .. } => StatusCode::BAD_REQUEST,
            ApiError::Clustering(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            ApiError::InvalidParameters(detail) | ApiError::Clustering(detail) => Some(detail.clone()),
            ApiError::ZoomOutOfRange { .. } => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Clustering(detail) = &self {
            error!(error = %detail, "Clustering operation failed");
        }
        let body = ErrorBody {
            message: self.to_string(),
            error: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
