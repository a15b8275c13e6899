//! Cleanup Task
//!
//! Background task that periodically sweeps expired store entries and
//! forgets rate-limiter callers whose cooldown has passed.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::StoreAdapter;
use crate::service::SubmissionRateLimiter;

/// Spawns the periodic sweep.
///
/// Returns a JoinHandle so the task can be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cleanup_handle = spawn_cleanup_task(adapter.clone(), limiter.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    adapter: StoreAdapter,
    limiter: Arc<SubmissionRateLimiter>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = adapter.purge_expired().await;
            let pruned = limiter.prune().await;

            if removed > 0 || pruned > 0 {
                info!(
                    "Cleanup: removed {} expired entries, pruned {} callers",
                    removed, pruned
                );
            } else {
                debug!("Cleanup: nothing to remove");
            }
        }
    })
}
