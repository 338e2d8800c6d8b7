//! Live snapshot synchronization and query engine for Crowdmap.
//!
//! The engine polls a crowd-data source on a fixed cadence, holds the
//! latest complete snapshot of named crowd observations, and answers
//! derived queries against it. Everything upstream of the data source
//! and downstream of the query results (map tiles, markers, widgets)
//! lives outside this crate.
//!
//! # Data flow
//!
//! [`Poller`] fetches from a [`SnapshotSource`] -> on success it
//! replaces the [`SnapshotStore`] contents atomically -> consumers
//! read the new snapshot on demand through the [`query`] functions,
//! driven by their own input changes (search text, city selection)
//! rather than by the poll event directly.
//!
//! # Modules
//!
//! - [`store`] -- current snapshot holder with atomic replace and
//!   change notifications
//! - [`poller`] -- fixed-cadence fetch-and-publish with start/stop
//!   lifecycle
//! - [`source`] -- HTTP and simulated snapshot sources
//! - [`query`] -- the pure query operations (search, city filter,
//!   most-crowded, heatmap projection, alerts)
//! - [`config`] -- environment-driven engine configuration
//! - [`error`] -- the engine error taxonomy

pub mod config;
pub mod error;
pub mod poller;
pub mod query;
pub mod source;
pub mod store;

pub use config::{EngineConfig, SourceKind};
pub use error::EngineError;
pub use poller::{Poller, PollerHandle};
pub use source::{HttpSource, SimulatedPlace, SimulatedSource, SnapshotSource};
pub use store::SnapshotStore;
