//! HTTP route handlers for Lanstreamer.

pub mod access;
pub mod auth;
pub mod health;
pub mod login;
pub mod request_info;

pub use auth::{AuthError, Identity, StaticTokenVerifier, TokenVerifier};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::server::AppState;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/desktop-app/access", get(access::handle_access))
        .route("/api/user/login", post(login::handle_login))
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
