//! HTTP server setup and lifecycle.
//!
//! Configures the axum server with:
//! - Access gate and login handlers over shared state
//! - Background cleanup of expired access grants
//! - Graceful shutdown support

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::ApiError;
use crate::flow::KeyedNotifier;
use crate::service::{self, StaticTokenVerifier, TokenVerifier};
use crate::storage::cleanup::spawn_cleanup;
use crate::storage::{ConfigurationKey, Store};

/// Server state shared across handlers.
pub struct AppState {
    pub store: Store,
    /// Access code -> waiting desktop app.
    pub notifier: KeyedNotifier<bool>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Lifetime of an access grant after login.
    pub access_ttl: Duration,
}

impl AppState {
    pub fn new(store: Store, verifier: Arc<dyn TokenVerifier>, access_ttl: Duration) -> Self {
        Self {
            store,
            notifier: KeyedNotifier::new(),
            verifier,
            access_ttl,
        }
    }

    /// Read a runtime setting. A missing row is a server fault: schema
    /// initialization seeds every key.
    pub fn setting(&self, key: ConfigurationKey) -> Result<String, ApiError> {
        self.store
            .configuration(key)?
            .ok_or_else(|| ApiError::Internal(format!("missing configuration {key}")))
    }
}

/// Run the Lanstreamer HTTP server.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `shutdown_rx` - Receiver for shutdown signal
///
/// # Returns
///
/// Returns when the server has shut down.
pub async fn run_server(config: Config, mut shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let store = Store::open(config.db_path(), config.pool_size)
        .with_context(|| format!("failed to open database at {}", config.db_path().display()))?;

    let verifier = match &config.identities_file {
        Some(path) => StaticTokenVerifier::from_file(path)
            .with_context(|| format!("failed to load identities from {}", path.display()))?,
        None => {
            tracing::warn!("No identities file configured, every login will be rejected");
            StaticTokenVerifier::new()
        }
    };
    tracing::info!(identities = verifier.identity_count(), "Token verifier ready");

    let cleanup = spawn_cleanup(store.clone(), config.cleanup_interval(), shutdown_rx.clone());

    let state = Arc::new(AppState::new(store, Arc::new(verifier), config.access_ttl()));
    let app = service::router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Starting Lanstreamer HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.changed().await;
            tracing::info!("Shutdown signal received, stopping server");
        })
        .await?;

    cleanup.await?;

    tracing::info!("Server stopped");
    Ok(())
}
