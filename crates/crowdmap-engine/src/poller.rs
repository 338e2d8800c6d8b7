//! The poller: periodic fetch-and-publish against a snapshot source.
//!
//! [`Poller::start`] spawns a tokio task that fetches immediately and
//! then once per interval. Successful fetches are published to the
//! [`SnapshotStore`]; failed fetches are logged and simply wait for
//! the next tick -- there is no retry or backoff, because staleness is
//! the dominant risk, not failure, and the next tick retries anyway.
//!
//! Lifecycle is owned by whoever holds the [`PollerHandle`]: stopping
//! the handle prevents any further publication, including from a fetch
//! that was already in flight when stop was requested.

use std::sync::Arc;
use std::time::Duration;

use crowdmap_types::Snapshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::source::SnapshotSource;
use crate::store::SnapshotStore;

/// Drives the periodic fetch-and-replace cycle.
pub struct Poller {
    store: Arc<SnapshotStore>,
    source: SnapshotSource,
    interval: Duration,
}

impl Poller {
    /// Create a poller publishing into `store` from `source` on the
    /// given cadence.
    pub const fn new(store: Arc<SnapshotStore>, source: SnapshotSource, interval: Duration) -> Self {
        Self {
            store,
            source,
            interval,
        }
    }

    /// Start polling. The first fetch happens immediately, then one
    /// fetch per interval.
    ///
    /// At most one fetch is in flight at a time: a fetch that takes
    /// longer than the interval delays the next tick rather than
    /// overlapping with it.
    pub fn start(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!(
            source = self.source.name(),
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            "poller starting"
        );
        let task = tokio::spawn(self.run(shutdown_rx));
        PollerHandle { shutdown_tx, task }
    }

    /// The poll loop. Runs until the shutdown flag is raised.
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = ticker.tick() => {
                    let result = self.source.fetch().await;

                    // A stop requested while the fetch was in flight
                    // discards the result: no publication after stop.
                    if *shutdown.borrow() {
                        debug!("discarding fetch result, poller stopped");
                        break;
                    }

                    match result {
                        Ok(records) => {
                            let snapshot = self.store.replace(Snapshot::new(records));
                            debug!(
                                record_count = snapshot.len(),
                                alert_count = snapshot.alert_count(),
                                "snapshot published"
                            );
                        }
                        Err(e) => {
                            // Last-known-good stays authoritative; the
                            // next tick is the retry.
                            warn!(
                                source = self.source.name(),
                                error = %e,
                                "fetch failed, keeping previous snapshot"
                            );
                        }
                    }
                }
            }
        }

        info!("poller stopped");
    }
}

/// Cancellation handle for a running poller.
///
/// Dropping the handle without calling [`stop`](Self::stop) also
/// signals shutdown, but does not wait for the task to wind down.
pub struct PollerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling and wait for the poll task to finish.
    ///
    /// A fetch already in flight is allowed to complete, but its
    /// result is discarded; after this returns, the store will receive
    /// no further snapshots from this poller.
    pub async fn stop(self) {
        // send fails only if the task already exited, which is fine.
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }

    /// Whether the poll task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}
