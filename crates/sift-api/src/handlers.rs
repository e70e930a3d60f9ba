//! HTTP request handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use sift_types::FeedbackReport;

use crate::{ApiError, AppState};

/// Body of `POST /report`.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub feedback: Vec<String>,
}

impl ReportRequest {
    /// The list must be non-empty and no item may be blank.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.feedback.is_empty() {
            return Err(ApiError::InvalidRequest(
                "feedback must contain at least one item".into(),
            ));
        }
        if let Some(index) = self.feedback.iter().position(|item| item.trim().is_empty()) {
            return Err(ApiError::InvalidRequest(format!(
                "feedback item {index} is empty"
            )));
        }
        Ok(())
    }
}

/// Service metadata and endpoint directory.
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "app": "Student Feedback Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/report": "POST - Generate a feedback analysis report",
            "/health": "GET - Check API health"
        }
    }))
}

/// Liveness and the configured model.
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "model": state.pipeline.model()
    }))
}

/// Run the report pipeline over the submitted feedback.
pub async fn report(
    State(state): State<AppState>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<FeedbackReport>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    request.validate()?;

    let report = state.pipeline.run(&request.feedback).await?;
    Ok(Json(report))
}
