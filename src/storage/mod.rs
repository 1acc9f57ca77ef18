//! SQLite storage layer for Lanstreamer.
//!
//! Provides:
//! - Schema initialization and configuration seeding
//! - Pooled store for users, access grants and settings
//! - Background cleanup of expired access grants

pub mod cleanup;
pub mod models;
pub mod schema;
pub mod store;

pub use models::{AccessRecord, ConfigurationKey, UserLogin, UserRecord};
pub use store::{Store, StoreError};
