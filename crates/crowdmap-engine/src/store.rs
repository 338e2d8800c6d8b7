//! The snapshot store: exactly one current snapshot, replaced
//! atomically.
//!
//! The store is the only shared resource in the engine. A published
//! [`Snapshot`] is immutable, so readers take a cheap [`Arc`] clone
//! under a read lock and the replace step is the only writer. Readers
//! therefore see all-old or all-new, never a mix of records.
//!
//! Before the first successful fetch, [`SnapshotStore::current`]
//! returns `None` -- the explicit "no data yet" state, distinct from an
//! empty snapshot (a successful fetch with zero records).

use std::sync::{Arc, PoisonError, RwLock};

use crowdmap_types::{Snapshot, SnapshotUpdate};
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for snapshot updates.
///
/// If a subscriber falls behind by more than this many messages it
/// will receive a [`broadcast::error::RecvError::Lagged`] and skip to
/// the newest message.
const BROADCAST_CAPACITY: usize = 64;

/// Holds the current snapshot and notifies subscribers on replacement.
pub struct SnapshotStore {
    /// The latest published snapshot, if any fetch has succeeded yet.
    current: RwLock<Option<Arc<Snapshot>>>,
    /// Broadcast sender for snapshot-changed notifications.
    tx: broadcast::Sender<SnapshotUpdate>,
}

impl SnapshotStore {
    /// Create an empty store in the "no data yet" state.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            current: RwLock::new(None),
            tx,
        }
    }

    /// Install a new snapshot as current, discarding the previous one.
    ///
    /// Replacement is all-or-nothing with respect to concurrent
    /// [`current`](Self::current) calls, and sequential replaces
    /// establish a total order: once a newer snapshot is installed, no
    /// reader observes an older one. After the swap, subscribers are
    /// notified with a [`SnapshotUpdate`].
    ///
    /// Returns the installed snapshot.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let update = SnapshotUpdate::of(&snapshot);
        {
            let mut guard = self
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = Some(Arc::clone(&snapshot));
        }
        // send fails only when there are zero subscribers, which is
        // normal when no consumer is listening.
        let _ = self.tx.send(update);
        snapshot
    }

    /// The latest snapshot, or `None` before the first successful
    /// fetch.
    ///
    /// Consumers must not hold the returned [`Arc`] across poll
    /// boundaries; re-query after each refresh to avoid acting on
    /// stale data.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to snapshot-changed notifications.
    ///
    /// Returns a receiver that yields one [`SnapshotUpdate`] per
    /// [`replace`](Self::replace) call made after subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotUpdate> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use crowdmap_types::ObservationRecord;

    use super::*;

    fn snapshot_with(names: &[(&str, u32)]) -> Snapshot {
        let mut records = BTreeMap::new();
        for &(name, count) in names {
            records.insert(
                name.to_owned(),
                ObservationRecord {
                    lat: 65.58,
                    lon: 22.15,
                    people_count: count,
                    alert: false,
                    timestamp: Utc::now(),
                    city: Some("Luleå".to_owned()),
                },
            );
        }
        Snapshot::new(records)
    }

    #[test]
    fn starts_with_no_data() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());
    }

    #[test]
    fn replace_installs_whole_snapshot() {
        let store = SnapshotStore::new();
        store.replace(snapshot_with(&[("A.Ts Krog", 10), ("Strand Galleria", 20)]));

        let current = store.current().unwrap();
        assert_eq!(current.len(), 2);
        assert!(current.get("A.Ts Krog").is_some());
    }

    #[test]
    fn second_replace_fully_discards_first() {
        // Atomicity property: after two sequential replaces the store
        // holds exactly the second snapshot, never a merge.
        let store = SnapshotStore::new();
        store.replace(snapshot_with(&[("A.Ts Krog", 10), ("Strand Galleria", 20)]));
        store.replace(snapshot_with(&[("Mood Galleria", 30)]));

        let current = store.current().unwrap();
        assert_eq!(current.len(), 1);
        assert!(current.get("Mood Galleria").is_some());
        assert!(current.get("A.Ts Krog").is_none());
    }

    #[test]
    fn empty_snapshot_is_distinct_from_no_data() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());

        store.replace(snapshot_with(&[]));
        let current = store.current().unwrap();
        assert!(current.is_empty());
    }

    #[tokio::test]
    async fn subscribers_are_notified_per_replace() {
        let store = SnapshotStore::new();
        let mut rx = store.subscribe();

        store.replace(snapshot_with(&[("A.Ts Krog", 10)]));
        store.replace(snapshot_with(&[("Mood Galleria", 30), ("NK Stockholm", 5)]));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.record_count, 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.record_count, 2);
    }

    #[test]
    fn replace_before_subscribe_is_not_replayed() {
        let store = SnapshotStore::new();
        store.replace(snapshot_with(&[("A.Ts Krog", 10)]));

        let mut rx = store.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
