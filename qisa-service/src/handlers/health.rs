use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

use crate::startup::AppState;

/// Liveness message served at `/`.
pub const LIVENESS_MESSAGE: &str = "API Qisa está funcionando!";

pub async fn index() -> impl IntoResponse {
    Json(json!({ "status": LIVENESS_MESSAGE }))
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "qisa-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check endpoint: the text provider must be reachable.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .gateway
        .provider()
        .health_check()
        .await
        .map(|_| StatusCode::OK)
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))
}

pub async fn metrics() -> impl IntoResponse {
    service_core::observability::render_metrics()
}
