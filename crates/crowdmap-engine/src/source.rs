//! Snapshot sources: where crowd data comes from.
//!
//! Defines an enum-based dispatch for snapshot sources, avoiding the
//! dyn-compatibility issues with async trait methods. The HTTP source
//! polls a remote crowd-data endpoint via `reqwest`; the simulated
//! source generates plausible data in-process, for demos and offline
//! development.
//!
//! The poller does not care where a snapshot comes from -- it asks for
//! one full record map and either gets it or an error.

use std::collections::BTreeMap;

use chrono::Utc;
use crowdmap_types::ObservationRecord;
use rand::Rng;

use crate::config::{EngineConfig, SourceKind};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Unified source enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// A source that can produce one complete crowd-data snapshot per
/// fetch.
pub enum SnapshotSource {
    /// Remote HTTP crowd-data endpoint.
    Http(HttpSource),
    /// In-process simulated data, no network involved.
    Simulated(SimulatedSource),
}

impl SnapshotSource {
    /// Fetch one full record map from the source.
    ///
    /// Each response is a complete snapshot; there are no partial
    /// updates.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the HTTP call fails, the source
    /// answers with a non-success status, or the body is not a valid
    /// crowd-data object. The simulated source never fails.
    pub async fn fetch(&self) -> Result<BTreeMap<String, ObservationRecord>, EngineError> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::Simulated(source) => Ok(source.generate(&mut rand::rng())),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Http(_) => "http",
            Self::Simulated(_) => "simulated",
        }
    }

    /// Build a source from engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration selects
    /// the HTTP source without a URL.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        match config.source {
            SourceKind::Http => {
                let url = config.source_url.clone().ok_or_else(|| {
                    EngineError::Config("HTTP source selected but no URL configured".to_owned())
                })?;
                Ok(Self::Http(HttpSource::new(url)))
            }
            SourceKind::Simulated => Ok(Self::Simulated(SimulatedSource::default())),
        }
    }
}

// ---------------------------------------------------------------------------
// HTTP source
// ---------------------------------------------------------------------------

/// Source backed by a remote crowd-data endpoint.
///
/// The endpoint returns a JSON object keyed by place name whose values
/// deserialize to [`ObservationRecord`]. No authentication or
/// pagination is assumed.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Create an HTTP source polling the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Issue one GET request and parse the body as a full snapshot.
    async fn fetch(&self) -> Result<BTreeMap<String, ObservationRecord>, EngineError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status { status });
        }

        let body = response.text().await?;
        let records: BTreeMap<String, ObservationRecord> = serde_json::from_str(&body)?;
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Simulated source
// ---------------------------------------------------------------------------

/// Headroom above a place's threshold when drawing a random count, so
/// alerts actually trigger now and then.
const COUNT_HEADROOM: u32 = 40;

/// A place known to the simulated source.
#[derive(Debug, Clone)]
pub struct SimulatedPlace {
    /// Place name, used as the snapshot key.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Crowd threshold above which the alert flag is raised.
    pub threshold: u32,
    /// City the place belongs to.
    pub city: String,
}

/// Source that fabricates crowd data in-process.
///
/// Each fetch draws a `people_count` in `0..=threshold + 40` per place
/// and raises the alert flag when the threshold is reached, matching
/// the behavior of the reference crowd-data server.
pub struct SimulatedSource {
    places: Vec<SimulatedPlace>,
}

impl SimulatedSource {
    /// Create a simulated source over an explicit place table.
    pub const fn new(places: Vec<SimulatedPlace>) -> Self {
        Self { places }
    }

    /// Generate one snapshot's worth of records using the given RNG.
    ///
    /// Separated from [`SnapshotSource::fetch`] so tests can pass a
    /// seeded RNG.
    pub fn generate(&self, rng: &mut impl Rng) -> BTreeMap<String, ObservationRecord> {
        let now = Utc::now();
        self.places
            .iter()
            .map(|place| {
                let people_count =
                    rng.random_range(0..=place.threshold.saturating_add(COUNT_HEADROOM));
                let record = ObservationRecord {
                    lat: place.lat,
                    lon: place.lon,
                    people_count,
                    alert: people_count >= place.threshold,
                    timestamp: now,
                    city: Some(place.city.clone()),
                };
                (place.name.clone(), record)
            })
            .collect()
    }
}

impl Default for SimulatedSource {
    /// The default Swedish place table used by the demo binary.
    fn default() -> Self {
        let places = [
            ("ICA Maxi Luleå", 65.6099, 22.1460, 60, "Luleå"),
            ("A.Ts Krog", 65.5838, 22.1531, 30, "Luleå"),
            ("Mood Galleria", 59.3342, 18.0675, 100, "Stockholm"),
            ("Kungsträdgården", 59.3303, 18.0722, 150, "Stockholm"),
            ("Gallerian Stockholm", 59.3326, 18.0649, 120, "Stockholm"),
            ("Smedjan Galleria", 65.5848, 22.1547, 70, "Luleå"),
            ("Shopping Galleria", 65.5840, 22.1543, 65, "Luleå"),
            ("Strand Galleria", 65.5832, 22.1551, 50, "Luleå"),
            ("Stadsparken Luleå", 65.5845, 22.1572, 80, "Luleå"),
            ("Luleå Airport", 65.5436, 22.1225, 90, "Luleå"),
            ("Clarion Hotel Sense", 65.5839, 22.1534, 40, "Luleå"),
        ]
        .into_iter()
        .map(|(name, lat, lon, threshold, city)| SimulatedPlace {
            name: name.to_owned(),
            lat,
            lon,
            threshold,
            city: city.to_owned(),
        })
        .collect();
        Self::new(places)
    }
}
