// ── Periodic refresh ──
//
// Background task that loads once immediately and then every `period`
// until cancelled. Ticks missed while a slow refresh runs are skipped,
// not replayed.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::loader::{Loader, VehicleSource};

/// Spawn the refresh loop. A zero `period` performs the initial load only.
pub fn spawn_refresh_task<S: VehicleSource>(
    loader: Loader<S>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(refresh_task(loader, period, cancel))
}

async fn refresh_task<S: VehicleSource>(
    loader: Loader<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    if period.is_zero() {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {}
            _ = loader.refresh() => {}
        }
        return;
    }

    // The first tick completes immediately, which gives the initial load.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are already logged and recorded in the store.
                if let Ok(outcome) = loader.refresh().await {
                    debug!(?outcome, "scheduled refresh");
                }
            }
        }
    }

    debug!("refresh task stopped");
}
