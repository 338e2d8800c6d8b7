//! Engine configuration loaded from environment variables.
//!
//! The engine needs to know which source to poll (real HTTP endpoint
//! or the in-process simulator) and how often. Everything has a
//! default except the source URL, which is required in HTTP mode.

use std::time::Duration;

use crate::error::EngineError;

/// Default poll cadence in milliseconds. Deployed variants use
/// 5000-6000 ms.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Which kind of snapshot source to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A remote HTTP crowd-data endpoint.
    Http,
    /// The in-process simulated source (no network).
    Simulated,
}

/// Complete engine configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Which source to poll.
    pub source: SourceKind,
    /// Crowd-data endpoint URL. Required when `source` is
    /// [`SourceKind::Http`], ignored otherwise.
    pub source_url: Option<String>,
    /// Time between polls.
    pub poll_interval: Duration,
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `CROWDMAP_SOURCE` -- `http` or `simulated` (default `simulated`)
    /// - `CROWDMAP_SOURCE_URL` -- crowd-data endpoint, required for `http`
    /// - `CROWDMAP_POLL_INTERVAL_MS` -- poll cadence in milliseconds
    ///   (default 5000)
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if a variable has an invalid
    /// value, or if `CROWDMAP_SOURCE_URL` is missing in HTTP mode.
    pub fn from_env() -> Result<Self, EngineError> {
        let source_str =
            std::env::var("CROWDMAP_SOURCE").unwrap_or_else(|_| "simulated".to_owned());
        let source = parse_source_kind(&source_str)?;

        let source_url = std::env::var("CROWDMAP_SOURCE_URL").ok();
        if source == SourceKind::Http && source_url.is_none() {
            return Err(EngineError::Config(
                "CROWDMAP_SOURCE_URL is required when CROWDMAP_SOURCE=http".to_owned(),
            ));
        }

        let poll_interval_ms: u64 = std::env::var("CROWDMAP_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_MS.to_string())
            .parse()
            .map_err(|e| EngineError::Config(format!("invalid CROWDMAP_POLL_INTERVAL_MS: {e}")))?;
        if poll_interval_ms == 0 {
            return Err(EngineError::Config(
                "CROWDMAP_POLL_INTERVAL_MS must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            source,
            source_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }
}

/// Parse a source kind string from the environment.
fn parse_source_kind(value: &str) -> Result<SourceKind, EngineError> {
    match value.trim().to_lowercase().as_str() {
        "http" => Ok(SourceKind::Http),
        "simulated" | "sim" => Ok(SourceKind::Simulated),
        other => Err(EngineError::Config(format!(
            "unknown CROWDMAP_SOURCE: {other}"
        ))),
    }
}
