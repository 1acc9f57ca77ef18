//! Notification infrastructure.
//!
//! Provides:
//! - Keyed single-shot channels for waking access-gate waiters

pub mod notify;

pub use notify::{KeyedNotifier, NotifyError, Registration, Subscription};
