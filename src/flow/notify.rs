//! Keyed single-shot notifications for access-gate wake-up.
//!
//! A waiter subscribes under a key (an access code) and parks on the
//! returned [`Subscription`]. An unrelated request path later calls
//! [`KeyedNotifier::send`] with the same key, which wakes the waiter.
//!
//! - One slot per key, capacity 1, read at most once
//! - Sending to an absent key drops the value
//! - Entries live until [`KeyedNotifier::unsubscribe`]; nothing expires

use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

/// Error type for waiting on a subscription.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("no notification received within {0:?}")]
    Timeout(Duration),
}

/// Registry of pending single-shot channels, keyed by an opaque string.
///
/// Backed by a sharded map so operations on unrelated keys do not
/// serialize behind one lock. Construct one per process and share it
/// through application state.
#[derive(Debug)]
pub struct KeyedNotifier<T> {
    /// key -> write half; `None` once the slot has been filled
    channels: DashMap<String, Option<oneshot::Sender<T>>>,
}

impl<T> Default for KeyedNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyedNotifier<T> {
    /// Create an empty notifier.
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Register a fresh channel under `key`.
    ///
    /// Any live entry for the same key is replaced. The replaced waiter
    /// keeps its handle but can no longer be reached by [`send`](Self::send);
    /// it resolves only through its own timeout.
    pub fn subscribe(&self, key: impl Into<String>) -> Subscription<T> {
        let key = key.into();
        let (tx, rx) = oneshot::channel();

        if self.channels.insert(key.clone(), Some(tx)).is_some() {
            tracing::warn!(key = %key, "Replacing live subscription for key");
        }

        Subscription { rx }
    }

    /// Unsubscribe `key` when the returned guard drops.
    ///
    /// Hold the guard across the wait so a cancelled waiter (client
    /// hangup drops the handler future) releases its slot too.
    pub fn unsubscribe_on_drop(&self, key: impl Into<String>) -> Registration<'_, T> {
        Registration {
            notifier: self,
            key: key.into(),
        }
    }

    /// Deliver `value` to the subscriber registered under `key`.
    ///
    /// Returns `true` if a live slot accepted the value. With no
    /// subscriber, or a slot that was already filled, the value is
    /// dropped and `false` is returned.
    pub fn send(&self, key: &str, value: T) -> bool {
        let Some(mut slot) = self.channels.get_mut(key) else {
            tracing::debug!(key, "No subscriber for key, dropping notification");
            return false;
        };

        match slot.take() {
            // Err means the waiter dropped its handle already
            Some(tx) => tx.send(value).is_ok(),
            None => {
                tracing::debug!(key, "Slot already filled, dropping notification");
                false
            }
        }
    }

    /// Remove the entry for `key`, read or not. Removing an absent key
    /// is a no-op.
    pub fn unsubscribe(&self, key: &str) {
        self.channels.remove(key);
    }

    /// Whether an entry is currently registered for `key`.
    pub fn is_subscribed(&self, key: &str) -> bool {
        self.channels.contains_key(key)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Read half of a single-shot channel returned by
/// [`KeyedNotifier::subscribe`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Take the buffered value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }

    /// Wait for the value.
    ///
    /// If the registry drops the write half (unsubscribe or replacement)
    /// before a value arrives, this never resolves; race it against a
    /// deadline, as [`wait`](Self::wait) does.
    pub async fn recv(self) -> T {
        match self.rx.await {
            Ok(value) => value,
            Err(_) => std::future::pending().await,
        }
    }

    /// Wait for the value for at most `timeout`.
    ///
    /// Expiry leaves the registry untouched; the caller still has to
    /// unsubscribe.
    pub async fn wait(self, timeout: Duration) -> Result<T, NotifyError> {
        tokio::time::timeout(timeout, self.recv())
            .await
            .map_err(|_| NotifyError::Timeout(timeout))
    }
}

/// Removes its key from the notifier on drop.
#[derive(Debug)]
#[must_use = "dropping the registration unsubscribes immediately"]
pub struct Registration<'a, T> {
    notifier: &'a KeyedNotifier<T>,
    key: String,
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.notifier.unsubscribe(&self.key);
    }
}
