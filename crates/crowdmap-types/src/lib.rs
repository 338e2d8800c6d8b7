//! Shared type definitions for the Crowdmap engine.
//!
//! This crate is the single source of truth for the data model shared
//! between the sync engine and its consumers. Types defined here flow
//! downstream to `TypeScript` via `ts-rs` for the map dashboard.
//!
//! # Modules
//!
//! - [`record`] -- The per-place observation record and heatmap projection
//! - [`snapshot`] -- The immutable point-in-time snapshot and its update event
//! - [`city`] -- City scoping for filter and search operations

pub mod city;
pub mod record;
pub mod snapshot;

// Re-export all public types at crate root for convenience.
pub use city::CitySelection;
pub use record::{HeatPoint, ObservationRecord};
pub use snapshot::{Snapshot, SnapshotUpdate};
