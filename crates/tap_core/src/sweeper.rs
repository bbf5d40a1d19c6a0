//! Background expiry sweeping
//!
//! The store only rejects expired tokens lazily at consume time; this task
//! periodically removes them so the in-memory maps don't grow unbounded.

use std::sync::Arc;
use std::time::Duration;

use crate::protocol::TieredAccessProtocol;

/// Spawn the periodic expiry sweep for `protocol`
///
/// The returned handle can be aborted on shutdown; the task itself runs
/// until then.
pub fn spawn_expiry_sweeper(
    protocol: Arc<TieredAccessProtocol>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        // Skip the first tick so we don't immediately fire on startup
        ticker.tick().await;

        tracing::info!("expiry sweeper started, checking every {:?}", interval);

        loop {
            ticker.tick().await;
            protocol.cleanup_expired();
        }
    })
}
