use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::storage::{PostStore, StoreError};

/// Spawns a task that purges expired posts every `period`, in addition to
/// the sweep every store operation already runs. Stops once the store is
/// closed or its lock is poisoned.
pub fn spawn_sweeper(store: Arc<dyn PostStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Background sweep every {:?}", period);
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match store.purge_expired() {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "Background sweep removed expired posts"),
                Err(StoreError::Closed) => {
                    info!("Store closed, stopping background sweep");
                    break;
                }
                // 中毒的锁不会恢复
                Err(StoreError::LockPoisoned) => {
                    error!("Store lock poisoned, stopping background sweep");
                    break;
                }
                Err(e) => warn!("Background sweep failed: {}", e),
            }
        }
    })
}
