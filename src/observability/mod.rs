//! Observability infrastructure.
//!
//! Provides:
//! - Structured tracing with env-based filtering

pub mod tracing;
