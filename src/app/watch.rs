//! Periodic queue draining.

use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use tokio::time::{interval, MissedTickBehavior};

use crate::sync::SyncCoordinator;

/// Drains the pending queue every `period` until `shutdown` resolves.
///
/// Drains run one after another on the same coordinator, so they never
/// overlap. A failed drain is logged and retried on the next tick. Returns
/// the number of passes that completed without error.
pub async fn run_periodic_sync<F>(
    coordinator: &mut SyncCoordinator,
    period: Duration,
    shutdown: F,
) -> usize
where
    F: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut succeeded = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Stopping periodic sync after {succeeded} successful pass(es)");
                return succeeded;
            }
            _ = ticker.tick() => {
                match coordinator.sync_pending_records().await {
                    Ok(_) => succeeded += 1,
                    Err(e) => warn!("Periodic sync failed, will retry: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::test_config;
    use crate::storage::{run_migrations, ConnectionManager, Endpoint};
    use crate::sync::SyncOptions;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_periodic_sync_stops_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let mut manager = ConnectionManager::new(test_config(&dir), Endpoint::Local);
        run_migrations(&mut manager).await.unwrap();
        let mut coordinator = SyncCoordinator::new(manager, SyncOptions::default());

        let passes = run_periodic_sync(
            &mut coordinator,
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_millis(55)),
        )
        .await;
        assert!(passes >= 1);
    }
}
