//! Expiry sweeps and the background sweeper task.
//!
//! A record with a ttl moves through three states: live, expired-but-present
//! (reads already behave as `NotFound`, bytes still on disk), and removed.
//! Only a sweep performs the last step; it exists to reclaim space, not to
//! enforce visibility.
//!
//! The sweeper is an explicit, caller-owned background task: construct the
//! store, then [`ExpirySweeper::start`] it (or not - sweeps can also be
//! driven by hand via [`TableStore::sweep_expired`]). Dropping the handle
//! stops the task; in-flight transactions are never interrupted because each
//! sweep is its own transaction.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::engine::envelope;
use crate::error::Result;
use crate::keys::codec;
use crate::store::TableStore;
use crate::DEFAULT_SWEEP_INTERVAL;

impl TableStore {
    /// Deletes every entry whose expiry has passed, in one write
    /// transaction. Returns the number of entries removed.
    ///
    /// Entries without an expiry (including all index entries) are never
    /// touched. A record saved concurrently with the sweep is either fully
    /// present or fully removed afterwards, never half-written - the sweep
    /// and the save are separate atomic transactions.
    pub fn sweep_expired(&self) -> Result<u64> {
        let now = envelope::now_ms();

        let mut tx = self.engine().write_tx();
        let mut expired = Vec::new();
        for item in tx.iter(self.engine().entries()) {
            let (physical, entry) = item?;
            let (expires_at, _) = envelope::decode(&entry)?;
            if envelope::is_expired(expires_at, now) {
                expired.push(physical);
            }
        }

        if expired.is_empty() {
            // Nothing to do; drop the transaction instead of committing it.
            return Ok(0);
        }

        let count = expired.len() as u64;
        for physical in expired {
            tx.remove(self.engine().entries(), physical);
        }
        self.engine().commit(tx)?;

        info!(removed = count, "expired records swept");
        Ok(count)
    }

    /// Returns the (table, key) of every live record whose expiry falls
    /// within `threshold` of now. Records without an expiry are never
    /// reported; already-expired records read as absent and are skipped.
    ///
    /// Read-only; nothing is mutated.
    pub fn near_expiration(&self, threshold: Duration) -> Result<Vec<(String, String)>> {
        let now = envelope::now_ms();
        let cutoff = now.saturating_add(threshold.as_millis() as u64);

        let rtx = self.engine().read_tx();
        let mut near = Vec::new();
        for item in rtx.iter(self.engine().entries()) {
            let (physical, entry) = item?;
            let (expires_at, _) = envelope::decode(&entry)?;
            let Some(expires_at) = expires_at else { continue };
            if expires_at > now && expires_at <= cutoff {
                if let Some((table, key)) = codec::split_record_key(&physical) {
                    near.push((table.to_string(), key.to_string()));
                }
            }
        }
        Ok(near)
    }
}

/// Configuration for the background sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Interval between sweeps.
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

/// A handle to the running background sweeper.
///
/// When this handle is dropped, the sweeper task is stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the sweeper as a background task on the current tokio
    /// runtime.
    ///
    /// The task sweeps every `config.interval` until the returned handle is
    /// stopped or dropped.
    pub fn start(store: Arc<TableStore>, config: SweeperConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(store, config, shutdown_rx));

        info!("background expiry sweeper started");

        Self { shutdown_tx }
    }

    /// Stops the sweeper.
    ///
    /// Called automatically when the handle is dropped.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
        info!("background expiry sweeper stopped");
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    store: Arc<TableStore>,
    config: SweeperConfig,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        // A failed sweep is logged and retried at the next tick; it must
        // never take the task down.
        match store.sweep_expired() {
            Ok(0) => trace!("sweep found nothing to remove"),
            Ok(removed) => debug!(removed, "background sweep removed expired records"),
            Err(e) => warn!(error = %e, "background sweep failed"),
        }
    }
}

/// Starts the sweeper with default configuration.
///
/// This is a convenience function for simple use cases.
pub fn start_expiry_sweeper(store: Arc<TableStore>) -> ExpirySweeper {
    ExpirySweeper::start(store, SweeperConfig::default())
}
