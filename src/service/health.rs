//! Liveness and readiness checks.
//!
//! - `/health` - Process is up
//! - `/ready` - Database pool can hand out a connection

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::server::AppState;

/// Handle GET /health - Basic health check.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Handle GET /ready - Readiness check.
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.get() {
        Ok(_) => (StatusCode::OK, "READY"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
        }
    }
}
