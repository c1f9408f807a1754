//! Statistics Reporter Task
//!
//! Background task that periodically logs cache statistics of a shared map.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::map::ParametricMap;

/// Spawns a background task that logs the map's cache statistics.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports. It only takes a read lock, so it never competes with
/// other readers.
///
/// # Arguments
/// * `map` - Shared reference to the map
/// * `interval_secs` - Interval in seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_stats_task<A>(map: Arc<RwLock<ParametricMap<A>>>, interval_secs: u64) -> JoinHandle<()>
where
    A: Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting statistics reporter with interval of {} seconds",
            interval_secs
        );

        let mut last_lookups = 0;
        loop {
            tokio::time::sleep(interval).await;

            let stats = {
                let guard = map.read().await;
                guard.stats()
            };

            let lookups = stats.lookups();
            if lookups > last_lookups {
                info!(
                    "Cache stats: entries={}, hits={}, misses={}, computations={}, evictions={}, hit_rate={:.3}",
                    stats.total_entries,
                    stats.hits,
                    stats.misses,
                    stats.computations,
                    stats.evictions,
                    stats.hit_rate()
                );
            } else {
                debug!("Cache stats: no lookups since last report");
            }
            last_lookups = lookups;
        }
    })
}
