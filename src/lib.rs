//! Lanstreamer: distribution backend for the Lanstreamer desktop app.
//!
//! The desktop app unlocks by holding open a streaming request on the
//! access gate until a user logs in on the web with the same access code.
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`error`]: HTTP error envelope
//! - [`flow`]: Keyed single-shot notifier behind the access gate
//! - [`observability`]: Tracing setup
//! - [`server`]: Shared state and HTTP server lifecycle
//! - [`service`]: Route handlers (access gate, login, health)
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::store::StoreError is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod config;
pub mod error;
pub mod flow;
pub mod observability;
pub mod server;
pub mod service;
pub mod storage;

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before Unix epoch")
        .as_millis() as i64
}
