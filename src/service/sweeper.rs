//! Periodic expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{UpdateService, now_millis};

/// Spawns a task that runs [`UpdateService::sweep_expired`] every `period`.
///
/// The first sweep runs immediately. Failures are logged and the loop keeps
/// going; the task only ends when aborted.
pub fn spawn_sweeper(service: Arc<UpdateService>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = service.sweep_expired(now_millis()).await {
                tracing::error!(error = %e, "scheduled sweep failed");
            }
        }
    })
}
