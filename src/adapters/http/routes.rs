//! Service routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::error::{ApiError, HttpError};
use crate::domain::models::{AppConfig, Environment};
use crate::SERVICE_NAME;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving.
    pub status: &'static str,
    /// Service name, the same value every log record carries.
    pub service: &'static str,
    /// Environment the process was started in.
    pub environment: Environment,
}

/// Routes served by the API, without the request pipeline.
pub fn api_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .with_state(config)
}

async fn health_check(State(config): State<Arc<AppConfig>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        environment: config.environment(),
    })
}

/// Unknown routes, and known paths hit with an unsupported method, get the
/// canonical 404 body.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    HttpError::not_found(format!("Cannot {method} {}", uri.path())).into()
}
