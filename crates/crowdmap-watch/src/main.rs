//! Console watcher binary for the Crowdmap sync engine.
//!
//! Wires the engine together the way a map frontend would: start the
//! poller against the configured source, subscribe to snapshot
//! updates, and on each refresh log the headline queries (most
//! crowded place, active alerts). Runs until ctrl-c.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load engine configuration from the environment
//! 3. Build the snapshot source and store
//! 4. Start the poller
//! 5. Log each published snapshot until ctrl-c
//! 6. Stop the poller and exit

use std::sync::Arc;

use crowdmap_engine::{query, EngineConfig, Poller, SnapshotSource, SnapshotStore};
use crowdmap_types::CitySelection;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point for the watcher.
///
/// # Errors
///
/// Returns an error if configuration is invalid.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("crowdmap-watch starting");

    let config = EngineConfig::from_env()?;
    info!(
        source = ?config.source,
        source_url = config.source_url.as_deref().unwrap_or("-"),
        poll_interval_ms = u64::try_from(config.poll_interval.as_millis()).unwrap_or(u64::MAX),
        "configuration loaded"
    );

    let source = SnapshotSource::from_config(&config)?;
    let store = Arc::new(SnapshotStore::new());
    let mut updates = store.subscribe();

    let handle = Poller::new(Arc::clone(&store), source, config.poll_interval).start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, shutting down");
                break;
            }
            update = updates.recv() => match update {
                Ok(update) => log_snapshot(&store, update.record_count),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "update stream lagged, skipping to newest");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    handle.stop().await;
    info!("crowdmap-watch shutdown complete");
    Ok(())
}

/// Log the headline view of the current snapshot: the most crowded
/// place overall and every place with an active alert.
fn log_snapshot(store: &SnapshotStore, record_count: usize) {
    let Some(snapshot) = store.current() else {
        return;
    };

    let everywhere = query::filter_by_city(&snapshot, &CitySelection::All);
    if let Some((name, record)) = query::most_crowded(everywhere) {
        info!(
            record_count,
            most_crowded = name,
            people_count = record.people_count,
            "snapshot refreshed"
        );
    } else {
        info!(record_count, "snapshot refreshed (no places)");
    }

    for (name, record) in query::active_alerts(&snapshot) {
        warn!(
            place = name,
            people_count = record.people_count,
            city = record.city.as_deref().unwrap_or("-"),
            "crowd threshold reached"
        );
    }
}
