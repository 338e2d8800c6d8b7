//! Error types for the Crowdmap engine.
//!
//! Fetch failures are caught at the poller boundary and logged; they
//! never reach consumers and never disturb the last-known-good
//! snapshot. Query operations cannot fail on well-typed input, so no
//! query variant exists here: "no match" is an empty result, not an
//! error.

use reqwest::StatusCode;

/// Errors that can occur while configuring or fetching from a source.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The HTTP request itself failed (connect, timeout, TLS, ...).
    #[error("crowd-data request failed: {source}")]
    Http {
        /// The underlying transport error.
        #[from]
        source: reqwest::Error,
    },

    /// The source answered with a non-success HTTP status.
    #[error("crowd-data source returned {status}")]
    Status {
        /// The status code returned by the source.
        status: StatusCode,
    },

    /// The response body was not a valid crowd-data snapshot.
    #[error("malformed crowd-data body: {source}")]
    Decode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Invalid or missing engine configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
