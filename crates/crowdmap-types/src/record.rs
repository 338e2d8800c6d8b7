//! Per-place observation records and their heatmap projection.
//!
//! [`ObservationRecord`] mirrors the value shape of the upstream
//! `/crowd-data` response exactly: the response is a JSON object keyed
//! by place name, so the name lives in the snapshot map key rather
//! than in the record itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The latest known observation for a single place.
///
/// All fields come from the upstream data source; nothing is derived
/// locally. In particular [`alert`](Self::alert) is set server-side
/// when the place's crowd threshold has been crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObservationRecord {
    /// Latitude of the place in decimal degrees.
    pub lat: f64,
    /// Longitude of the place in decimal degrees.
    pub lon: f64,
    /// Number of people observed at the place. Never negative.
    pub people_count: u32,
    /// Whether the server-side crowd threshold has been crossed.
    pub alert: bool,
    /// When the source last measured this place.
    pub timestamp: DateTime<Utc>,
    /// The city this place belongs to. Absent in global data sources
    /// that do not scope places to cities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A single heatmap intensity point derived from an observation.
///
/// The weight is the raw crowd count. Zero-weight points are still
/// emitted by the projection; suppressing them is a rendering decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HeatPoint {
    /// Latitude of the point in decimal degrees.
    pub lat: f64,
    /// Longitude of the point in decimal degrees.
    pub lon: f64,
    /// Intensity weight, equal to the source record's `people_count`.
    pub weight: u32,
}

impl ObservationRecord {
    /// Project this record to a heatmap point.
    pub const fn heat_point(&self) -> HeatPoint {
        HeatPoint {
            lat: self.lat,
            lon: self.lon,
            weight: self.people_count,
        }
    }
}
