//! Data bridge: forwards [`DataStore`] changes to TUI actions.
//!
//! Runs as a background task subscribed to the store's watch channels,
//! sending every change through the TUI's action channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use gatelog_core::DataStore;

use crate::action::Action;

pub async fn spawn_data_bridge(
    store: Arc<DataStore>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut vehicles = store.subscribe_vehicles();
    let mut statistics = store.subscribe_statistics();
    let mut load_state = store.subscribe_load_state();

    // Initial snapshots so the screen renders "Loading..." right away
    let _ = action_tx.send(Action::LoadStateChanged(*load_state.borrow_and_update()));
    let _ = action_tx.send(Action::StatisticsUpdated(*statistics.borrow_and_update()));
    let _ = action_tx.send(Action::VehiclesUpdated(Arc::clone(
        &vehicles.borrow_and_update(),
    )));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = vehicles.changed() => {
                let snap = Arc::clone(&vehicles.borrow_and_update());
                debug!(count = snap.len(), "dispatching VehiclesUpdated");
                let _ = action_tx.send(Action::VehiclesUpdated(snap));
            }
            Ok(()) = statistics.changed() => {
                let stats = *statistics.borrow_and_update();
                let _ = action_tx.send(Action::StatisticsUpdated(stats));
            }
            Ok(()) = load_state.changed() => {
                let state = *load_state.borrow_and_update();
                let _ = action_tx.send(Action::LoadStateChanged(state));
            }
        }
    }

    debug!("data bridge shut down");
}
