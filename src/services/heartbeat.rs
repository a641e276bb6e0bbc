use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::info;

use crate::bot::data::Data;
use crate::constants::durations::HEARTBEAT_INTERVAL_SECONDS;

/// Periodic liveness log line, the log-side counterpart of the keep-alive
/// endpoint
pub fn spawn_heartbeat(data: Arc<Data>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECONDS));
        // The first tick completes immediately; skip it so the log starts
        // one interval after connect
        ticker.tick().await;

        loop {
            ticker.tick().await;
            info!(
                "Heartbeat: {} active confinement(s), {} pending release timer(s)",
                data.ledger.active_count(),
                data.scheduler.pending_count()
            );
        }
    });
}
