//! Test utilities and in-process app harness for Lanstreamer tests.
//!
//! Provides:
//! - Router over a temporary SQLite database
//! - Static token verifier with one known token
//! - Request/response helpers

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

use lanstreamer::error::ErrorResponse;
use lanstreamer::observability::tracing::init_test_tracing;
use lanstreamer::server::AppState;
use lanstreamer::service::{self, Identity, StaticTokenVerifier};
use lanstreamer::storage::{ConfigurationKey, Store};

pub const CORRECT_TOKEN: &str = "correct-token";
pub const SUBJECT: &str = "subject/id";

/// In-process application backed by a temporary database.
///
/// The directory is removed when the fixture is dropped.
pub struct TestApp {
    pub temp_dir: TempDir,
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_access_ttl(Duration::from_secs(600))
    }

    pub fn with_access_ttl(access_ttl: Duration) -> Self {
        init_test_tracing();

        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let store = Store::open(temp_dir.path().join("test.db"), 4).expect("failed to open store");

        let verifier = StaticTokenVerifier::new().with_identity(
            CORRECT_TOKEN,
            Identity {
                subject: SUBJECT.to_string(),
                email: "email".to_string(),
                name: Some("name".to_string()),
            },
        );

        let state = Arc::new(AppState::new(
            store,
            Arc::new(verifier),
            access_ttl,
        ));
        let router = service::router(Arc::clone(&state));

        Self {
            temp_dir,
            state,
            router,
        }
    }

    pub fn configure(&self, key: ConfigurationKey, value: &str) {
        self.state
            .store
            .set_configuration(key, value)
            .expect("failed to set configuration");
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn access_request(access_code: &str, version: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(format!(
            "/api/desktop-app/access?accessCode={access_code}&version={version}"
        ))
        .header(header::ACCEPT, "text/event-stream")
        .body(Body::empty())
        .unwrap()
}

pub fn login_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/user/login")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is not utf-8")
}

pub async fn error_body(response: Response<Body>) -> ErrorResponse {
    serde_json::from_str(&body_string(response).await).expect("body is not an error envelope")
}

/// Wait for a condition to become true with timeout.
///
/// # Returns
///
/// `true` if condition was met, `false` if timeout expired
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
