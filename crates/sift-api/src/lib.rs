//! HTTP API for the sift feedback analysis service.
//!
//! Three routes:
//!
//! - `GET /` -- service metadata and an endpoint directory
//! - `GET /health` -- liveness plus the configured model
//! - `POST /report` -- run the report pipeline over `{ "feedback": [...] }`

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sift_core::ReportPipeline;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared state accessible by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReportPipeline>,
}

impl AppState {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the router with all routes.
///
/// An empty `cors_origins` list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/report", post(handlers::report))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
