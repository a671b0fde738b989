// ── Central reactive data store ──
//
// Holds the latest vehicle list, statistics and load state. Each field
// lives in a `watch` channel: readers take cheap snapshots or await
// changes, and only the loader writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::error::LoadFailure;
use crate::model::{Statistics, VehicleEntry};

/// Shared, immutable snapshot of the vehicle list.
pub type VehicleSnapshot = Arc<Vec<Arc<VehicleEntry>>>;

/// Progress of the most recent refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(LoadFailure),
}

/// Reactive application state shared between the loader and front ends.
pub struct DataStore {
    vehicles: watch::Sender<VehicleSnapshot>,
    statistics: watch::Sender<Statistics>,
    load_state: watch::Sender<LoadState>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (vehicles, _) = watch::channel(Arc::new(Vec::new()));
        let (statistics, _) = watch::channel(Statistics::default());
        let (load_state, _) = watch::channel(LoadState::Idle);
        let (last_refresh, _) = watch::channel(None);

        Self {
            vehicles,
            statistics,
            load_state,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn vehicles_snapshot(&self) -> VehicleSnapshot {
        self.vehicles.borrow().clone()
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.borrow().len()
    }

    pub fn statistics(&self) -> Statistics {
        *self.statistics.borrow()
    }

    pub fn load_state(&self) -> LoadState {
        *self.load_state.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_vehicles(&self) -> watch::Receiver<VehicleSnapshot> {
        self.vehicles.subscribe()
    }

    pub fn subscribe_statistics(&self) -> watch::Receiver<Statistics> {
        self.statistics.subscribe()
    }

    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last successful refresh happened.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Mutation (loader only) ───────────────────────────────────────

    /// Replace the vehicle list wholesale.
    pub(crate) fn replace_vehicles(&self, entries: Vec<VehicleEntry>) {
        let snapshot: VehicleSnapshot = Arc::new(entries.into_iter().map(Arc::new).collect());
        self.vehicles.send_replace(snapshot);
    }

    pub(crate) fn replace_statistics(&self, stats: Statistics) {
        self.statistics.send_replace(stats);
    }

    pub(crate) fn set_load_state(&self, state: LoadState) {
        self.load_state.send_replace(state);
    }

    pub(crate) fn mark_refreshed(&self, at: DateTime<Utc>) {
        self.last_refresh.send_replace(Some(at));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(no: &str) -> VehicleEntry {
        VehicleEntry {
            vehicle_no: no.into(),
            visitor_name: None,
            phone: None,
            purpose: None,
            in_time: "2024-03-05 09:15:00".into(),
            out_time: None,
            image_path: None,
        }
    }

    #[test]
    fn new_store_is_empty_and_idle() {
        let store = DataStore::new();
        assert_eq!(store.vehicle_count(), 0);
        assert_eq!(store.load_state(), LoadState::Idle);
        assert_eq!(store.last_refresh(), None);
        assert!(store.data_age().is_none());
    }

    #[test]
    fn replace_is_wholesale() {
        let store = DataStore::new();
        store.replace_vehicles(vec![entry("A"), entry("B")]);
        store.replace_vehicles(vec![entry("C")]);
        let snap = store.vehicles_snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].vehicle_no, "C");
    }

    #[test]
    fn old_snapshots_survive_replacement() {
        let store = DataStore::new();
        store.replace_vehicles(vec![entry("A")]);
        let before = store.vehicles_snapshot();
        store.replace_vehicles(Vec::new());
        assert_eq!(before.len(), 1);
        assert_eq!(store.vehicle_count(), 0);
    }

    #[test]
    fn failure_keeps_previous_rows() {
        let store = DataStore::new();
        store.replace_vehicles(vec![entry("A")]);
        store.set_load_state(LoadState::Failed(LoadFailure::Network));
        assert_eq!(store.load_state(), LoadState::Failed(LoadFailure::Network));
        assert_eq!(store.vehicle_count(), 1);
    }

    #[test]
    fn refresh_stamps_data_age() {
        let store = DataStore::new();
        store.replace_vehicles(vec![entry("A"), entry("B")]);
        store.mark_refreshed(Utc::now());
        store.set_load_state(LoadState::Ready);
        assert_eq!(store.vehicle_count(), 2);
        assert!(store.data_age().is_some());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = DataStore::new();
        let mut rx = store.subscribe_vehicles();
        store.replace_vehicles(vec![entry("A")]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
