//! Lanstreamer: desktop-app distribution backend.
//!
//! # Usage
//!
//! ```bash
//! lanstreamer --port 8080 --data-dir ./data --identities-file identities.json
//! ```
//!
//! Environment variables can also be used:
//! - `LANSTREAMER_PORT`: Port to listen on
//! - `LANSTREAMER_DATA_DIR`: Data directory for SQLite
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use lanstreamer::config::Config;
use lanstreamer::observability::tracing::init_tracing;
use lanstreamer::server::run_server;
use std::fs;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
  Lanstreamer v{} - Desktop App Distribution API

  Configuration:
    Address:    {}:{}
    Data Dir:   {}
    Log Level:  {}

  Press Ctrl+C to shutdown gracefully.
"#,
        version,
        config.host,
        config.port,
        config.data_dir.display(),
        config.log_level
    );
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Received SIGINT, initiating shutdown...");
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating shutdown...");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse_args();
    init_tracing(&config.log_level);
    fs::create_dir_all(&config.data_dir)?;
    print_banner(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
        }
        let _ = shutdown_tx.send(true);
    });

    run_server(config, shutdown_rx).await?;

    tracing::info!("Lanstreamer shutdown complete");
    Ok(())
}
