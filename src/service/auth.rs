//! Bearer token verification.
//!
//! The identity provider sits behind [`TokenVerifier`]; handlers only see
//! the resulting [`Identity`].

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing google token")]
    MissingToken,

    #[error("Invalid google token")]
    InvalidToken,
}

/// Verified claims of a token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    /// Stable provider-side user id.
    pub subject: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Verifier backed by a fixed token table.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    identities: HashMap<String, Identity>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }

    /// Load a `{ "<token>": { "subject", "email", "name"? } }` JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let identities = serde_json::from_str(&raw)?;
        Ok(Self { identities })
    }

    pub fn identity_count(&self) -> usize {
        self.identities.len()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.identities
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::io::Write;

    fn identity() -> Identity {
        Identity {
            subject: "subject/id".to_string(),
            email: "email".to_string(),
            name: Some("name".to_string()),
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer correct-token"));
        assert_eq!(bearer_token(&headers), Ok("correct-token"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticTokenVerifier::new().with_identity("correct-token", identity());

        assert_eq!(verifier.verify("correct-token").await, Ok(identity()));
        assert_eq!(
            verifier.verify("incorrect-token").await,
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_static_verifier_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "tok": {{ "subject": "subject/id", "email": "email", "name": "name" }} }}"#
        )
        .unwrap();

        let verifier = StaticTokenVerifier::from_file(file.path()).unwrap();
        assert_eq!(verifier.identity_count(), 1);
    }
}
