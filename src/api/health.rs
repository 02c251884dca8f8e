//! Liveness and readiness probes.

use axum::{http::StatusCode, response::IntoResponse};

/// Handle GET /health - Basic health check.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Handle GET /ready - Readiness check.
pub async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, "READY")
}
