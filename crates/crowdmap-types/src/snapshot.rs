//! The immutable point-in-time snapshot and its update notification.
//!
//! A [`Snapshot`] is one complete, consistent view of all known places
//! at one fetch time. It is never mutated after construction; the
//! engine replaces the whole snapshot on each successful poll. Queries
//! therefore never observe a partially-updated state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::record::ObservationRecord;

/// One complete mapping of place name to observation, fetched at a
/// single point in time.
///
/// Records are held in a [`BTreeMap`] so iteration order is
/// deterministic (lexicographic by place name). That order is the
/// documented order for first-match search results and for
/// most-crowded tie-breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Snapshot {
    /// All known places, keyed by their unique name.
    records: BTreeMap<String, ObservationRecord>,
    /// When this snapshot was fetched from the source.
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot from freshly fetched records, stamped with the
    /// current time.
    pub fn new(records: BTreeMap<String, ObservationRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }

    /// Create a snapshot with an explicit fetch time (useful for tests
    /// and state restoration).
    pub const fn from_parts(
        records: BTreeMap<String, ObservationRecord>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            records,
            fetched_at,
        }
    }

    /// When this snapshot was fetched.
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// The full record map, keyed by place name.
    pub const fn records(&self) -> &BTreeMap<String, ObservationRecord> {
        &self.records
    }

    /// Look up a single place by its exact name.
    pub fn get(&self, name: &str) -> Option<&ObservationRecord> {
        self.records.get(name)
    }

    /// Iterate over `(name, record)` pairs in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObservationRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of places in this snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether this snapshot contains no places at all.
    ///
    /// An empty snapshot is a successful fetch that returned zero
    /// records; it is a different state from "no data yet".
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of places whose server-side alert flag is set.
    pub fn alert_count(&self) -> usize {
        self.records.values().filter(|r| r.alert).count()
    }
}

/// Lightweight notification published whenever a new snapshot is
/// installed.
///
/// Consumers subscribed to the store receive this instead of the full
/// snapshot; they re-read the store on demand, so a slow consumer can
/// never pin an old snapshot alive through the channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SnapshotUpdate {
    /// Fetch time of the snapshot that was just installed.
    pub fetched_at: DateTime<Utc>,
    /// Total number of places in the new snapshot.
    pub record_count: usize,
    /// Number of places with an active alert in the new snapshot.
    pub alert_count: usize,
}

impl SnapshotUpdate {
    /// Summarize a snapshot into its update notification.
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            fetched_at: snapshot.fetched_at(),
            record_count: snapshot.len(),
            alert_count: snapshot.alert_count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(count: u32, alert: bool) -> ObservationRecord {
        ObservationRecord {
            lat: 65.58,
            lon: 22.15,
            people_count: count,
            alert,
            timestamp: Utc::now(),
            city: Some("Luleå".to_owned()),
        }
    }

    #[test]
    fn empty_snapshot_is_empty_not_missing() {
        let snapshot = Snapshot::new(BTreeMap::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
        assert_eq!(snapshot.alert_count(), 0);
    }

    #[test]
    fn iteration_order_is_name_sorted() {
        let mut records = BTreeMap::new();
        records.insert("Smedjan Galleria".to_owned(), record(10, false));
        records.insert("A.Ts Krog".to_owned(), record(20, false));
        records.insert("Luleå Airport".to_owned(), record(30, true));
        let snapshot = Snapshot::new(records);

        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A.Ts Krog", "Luleå Airport", "Smedjan Galleria"]);
    }

    #[test]
    fn update_summarizes_counts() {
        let mut records = BTreeMap::new();
        records.insert("A".to_owned(), record(5, true));
        records.insert("B".to_owned(), record(0, false));
        records.insert("C".to_owned(), record(7, true));
        let snapshot = Snapshot::new(records);

        let update = SnapshotUpdate::of(&snapshot);
        assert_eq!(update.record_count, 3);
        assert_eq!(update.alert_count, 2);
        assert_eq!(update.fetched_at, snapshot.fetched_at());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut records = BTreeMap::new();
        records.insert("ICA Maxi Luleå".to_owned(), record(42, false));
        let snapshot = Snapshot::new(records);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
