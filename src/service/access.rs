//! Access gate for the desktop app.
//!
//! The desktop app calls `GET /api/desktop-app/access` and holds the
//! request open until a user logs in with the same access code, or the
//! configured timeout passes.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ApiError;
use crate::flow::NotifyError;
use crate::server::AppState;
use crate::storage::ConfigurationKey;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessQuery {
    pub access_code: Option<String>,
    pub version: Option<String>,
}

/// Handle `GET /api/desktop-app/access`.
///
/// On login the response is a single line holding the offline login
/// allowance; on timeout a 408 envelope.
#[tracing::instrument(skip_all, fields(access_code))]
pub async fn handle_access(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AccessQuery>,
) -> Result<Response, ApiError> {
    let access_code = query
        .access_code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing access code".to_string()))?;
    let version = query.version.unwrap_or_default();

    tracing::Span::current().record("access_code", access_code.as_str());

    let supported = state.setting(ConfigurationKey::DesktopAppVersion)?;
    if version != supported {
        return Err(ApiError::Unauthorized("Version is not supported".to_string()));
    }

    let timeout = login_timeout(&state)?;

    let subscription = state.notifier.subscribe(access_code.as_str());
    // Released on every exit, including the client hanging up mid-wait
    let registration = state.notifier.unsubscribe_on_drop(access_code.as_str());
    tracing::debug!(timeout_secs = timeout.as_secs(), "Waiting for user login");

    let outcome = subscription.wait(timeout).await;
    drop(registration);

    match outcome {
        Ok(_) => {}
        Err(NotifyError::Timeout(_)) => {
            tracing::info!("Access gate timed out");
            return Err(ApiError::RequestTimeout(
                "Timeout waiting for user login".to_string(),
            ));
        }
    }

    record_app_version(&state, &access_code, &version)?;

    let offline_logins = state.setting(ConfigurationKey::OfflineLogins)?;
    tracing::info!("Desktop app unlocked");

    let line = tokio_stream::once(Ok::<_, Infallible>(format!("{offline_logins}\n")));
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(line),
    )
        .into_response())
}

fn login_timeout(state: &AppState) -> Result<Duration, ApiError> {
    let raw = state.setting(ConfigurationKey::LoginTimeoutSeconds)?;
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ApiError::Internal(format!("invalid LoginTimeoutSeconds {raw:?}: {e}")))
}

/// Store the unlocked app version on the user who owns the grant.
fn record_app_version(state: &AppState, access_code: &str, version: &str) -> Result<(), ApiError> {
    match state.store.access(access_code)?.and_then(|access| access.user_id) {
        Some(user_id) => {
            state.store.set_user_app_version(user_id, version)?;
        }
        None => tracing::warn!("Login notification without a bound access grant"),
    }
    Ok(())
}
