//! Error types for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sift_core::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No valid feedback after filtering.")]
    NoValidFeedback,

    #[error("Internal error: {0}")]
    Internal(PipelineError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        if err.is_client_error() {
            ApiError::NoValidFeedback
        } else {
            ApiError::Internal(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::NoValidFeedback => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "No valid feedback after filtering.".to_string(),
            ),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal processing error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
