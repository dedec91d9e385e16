//! Expiry Cleanup Task
//!
//! Background task that periodically drops the cached collection once its
//! sliding window has elapsed, so an idle cache releases its memory without
//! waiting for the next read.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntityCache;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between runs.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(cache: Arc<EntityCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_every(cache, Duration::from_secs(cleanup_interval_secs))
}

/// Like [`spawn_cleanup_task`] with a sub-second interval.
pub fn spawn_cleanup_every(cache: Arc<EntityCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry cleanup task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("Expiry cleanup: dropped {} expired cache entries", removed);
            } else {
                debug!("Expiry cleanup: nothing expired");
            }
        }
    })
}
