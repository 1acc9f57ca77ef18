//! Tracing setup.
//!
//! Configures structured logging with:
//! - Environment-based filter (via RUST_LOG), falling back to the CLI level
//! - Console fmt layer with source locations

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` applies to all
/// crates.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info,lanstreamer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!(level = default_level, "Tracing initialized");
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
