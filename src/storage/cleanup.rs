//! Periodic removal of expired access grants.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::store::Store;
use crate::now_millis;

/// Spawn the cleanup worker.
///
/// Runs every `interval` until `shutdown_rx` flips. A failed sweep is
/// logged and retried on the next tick.
pub fn spawn_cleanup(
    store: Store,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    sweep(&store);
                }
                _ = shutdown_rx.changed() => {
                    tracing::debug!("Access cleanup worker stopping");
                    break;
                }
            }
        }
    })
}

/// Run one sweep. Returns the number of grants removed.
pub fn sweep(store: &Store) -> usize {
    match store.delete_expired_accesses(now_millis()) {
        Ok(0) => 0,
        Ok(removed) => {
            tracing::info!(removed, "Removed expired access grants");
            removed
        }
        Err(e) => {
            tracing::error!(error = %e, "Access cleanup failed");
            0
        }
    }
}
