//! Login handler.
//!
//! Verifies the bearer token, records the user, and when an access code
//! is supplied binds it to the user and wakes any waiting desktop app.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::bearer_token;
use super::request_info::RequestInfo;
use crate::error::ApiError;
use crate::now_millis;
use crate::server::AppState;
use crate::storage::{ConfigurationKey, UserLogin};

pub const ROLE_USER: &str = "User";
pub const ROLE_ADMIN: &str = "Admin";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub access_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: i64,
    pub email: String,
    pub roles: Vec<String>,
}

/// Handle `POST /api/user/login`.
#[tracing::instrument(skip_all, fields(user_id))]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = bearer_token(&headers).map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    let identity = state
        .verifier
        .verify(token)
        .await
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let info = RequestInfo::from_headers(&headers);
    let now = now_millis();

    let user = state.store.upsert_user(
        &UserLogin {
            google_id: identity.subject,
            email: identity.email,
            name: identity.name,
            ip: info.ip,
            os: info.os,
            language: info.language,
        },
        now,
    )?;
    tracing::Span::current().record("user_id", user.id);

    let admin = state.setting(ConfigurationKey::AdminIdentifier)?;
    let mut roles = vec![ROLE_USER.to_string()];
    if !admin.is_empty() && admin == user.google_id {
        roles.push(ROLE_ADMIN.to_string());
    }

    if let Some(code) = request.access_code.filter(|code| !code.is_empty()) {
        let ttl = i64::try_from(state.access_ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl);
        state.store.upsert_access(&code, Some(user.id), expires_at)?;

        let delivered = state.notifier.send(&code, true);
        tracing::info!(delivered, "Access code bound to user");
    }

    tracing::debug!(roles = ?roles, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        email: user.email,
        roles,
    }))
}
