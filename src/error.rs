//! HTTP error envelope.
//!
//! Every failed request answers with
//! `{ "statusCode": <int>, "message": <string> }`. Internal failures are
//! logged with their cause and reported as a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StoreError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RequestTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn message(&self) -> String {
        match self {
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Internal(cause) => tracing::error!(error = %cause, "Request failed"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "Request rejected"),
        }

        let body = ErrorResponse {
            status_code: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn envelope(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_error_carries_message() {
        let (status, body) =
            envelope(ApiError::BadRequest("Test error message".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status_code, 400);
        assert_eq!(body.message, "Test error message");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_408() {
        let (status, body) =
            envelope(ApiError::RequestTimeout("Timeout waiting for user login".into())).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.status_code, 408);
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) = envelope(ApiError::Internal("disk on fire".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.status_code, 500);
        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn test_envelope_field_names() {
        let json = serde_json::to_value(ErrorResponse {
            status_code: 401,
            message: "Missing google token".to_string(),
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "statusCode": 401, "message": "Missing google token" })
        );
    }
}
