// ── Data loader ──
//
// Fetches statistics and the vehicle list concurrently and applies the
// results to the `DataStore`. At most one refresh runs at a time: a
// caller arriving while one is in flight waits for it to finish and is
// told its request was coalesced.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use gatelog_api::{GatelogClient, RawStatistics, RawVehicle};

use crate::error::{CoreError, LoadFailure};
use crate::model::{Statistics, VehicleEntry, VehicleHistory};
use crate::store::{DataStore, LoadState};

/// Where vehicle data comes from. Implemented by the HTTP client; tests
/// substitute an in-memory source.
pub trait VehicleSource: Send + Sync + 'static {
    fn fetch_statistics(
        &self,
    ) -> impl Future<Output = Result<RawStatistics, gatelog_api::Error>> + Send;

    fn fetch_vehicles(
        &self,
    ) -> impl Future<Output = Result<Vec<RawVehicle>, gatelog_api::Error>> + Send;

    fn fetch_history(
        &self,
        vehicle_no: &str,
    ) -> impl Future<Output = Result<gatelog_api::VehicleHistory, gatelog_api::Error>> + Send;
}

impl VehicleSource for GatelogClient {
    fn fetch_statistics(
        &self,
    ) -> impl Future<Output = Result<RawStatistics, gatelog_api::Error>> + Send {
        self.get_stats()
    }

    fn fetch_vehicles(
        &self,
    ) -> impl Future<Output = Result<Vec<RawVehicle>, gatelog_api::Error>> + Send {
        self.list_vehicles()
    }

    fn fetch_history(
        &self,
        vehicle_no: &str,
    ) -> impl Future<Output = Result<gatelog_api::VehicleHistory, gatelog_api::Error>> + Send
    {
        self.vehicle_history(vehicle_no)
    }
}

/// What a call to [`Loader::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetched and applied fresh data.
    Refreshed { vehicles: usize },
    /// Another refresh was already running; this call waited for it.
    Coalesced,
}

/// Single-flight refresher bound to one source and one store.
///
/// Cheaply cloneable; clones share the in-flight guard.
pub struct Loader<S> {
    inner: Arc<LoaderInner<S>>,
}

struct LoaderInner<S> {
    source: S,
    store: Arc<DataStore>,
    in_flight: Mutex<()>,
}

impl<S> Clone for Loader<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: VehicleSource> Loader<S> {
    pub fn new(source: S, store: Arc<DataStore>) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                source,
                store,
                in_flight: Mutex::new(()),
            }),
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Fetch both resources and apply them to the store.
    ///
    /// Whatever succeeded is applied even if the other fetch failed; the
    /// store then ends in `LoadState::Failed` and the first error is
    /// returned.
    pub async fn refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let Ok(_guard) = self.inner.in_flight.try_lock() else {
            let _wait = self.inner.in_flight.lock().await;
            debug!("refresh already in flight, coalesced");
            return Ok(RefreshOutcome::Coalesced);
        };

        let store = &self.inner.store;
        store.set_load_state(LoadState::Loading);

        let (stats_res, vehicles_res) = tokio::join!(
            self.inner.source.fetch_statistics(),
            self.inner.source.fetch_vehicles(),
        );

        let mut first_error: Option<CoreError> = None;

        match stats_res {
            Ok(raw) => store.replace_statistics(Statistics::from(raw)),
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "failed to load statistics");
                first_error.get_or_insert(err);
            }
        }

        let mut vehicle_count = 0;
        match vehicles_res {
            Ok(raw) => {
                vehicle_count = raw.len();
                store.replace_vehicles(raw.into_iter().map(VehicleEntry::from).collect());
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "failed to load vehicles");
                first_error.get_or_insert(err);
            }
        }

        if let Some(err) = first_error {
            store.set_load_state(LoadState::Failed(LoadFailure::from(&err)));
            return Err(err);
        }

        store.mark_refreshed(Utc::now());
        store.set_load_state(LoadState::Ready);
        info!(vehicles = vehicle_count, "dashboard data refreshed");
        Ok(RefreshOutcome::Refreshed {
            vehicles: vehicle_count,
        })
    }

    /// All visits of one vehicle. Does not touch the store.
    pub async fn history(&self, vehicle_no: &str) -> Result<VehicleHistory, CoreError> {
        match self.inner.source.fetch_history(vehicle_no).await {
            Ok(raw) => Ok(VehicleHistory::from(raw)),
            Err(e) if e.is_not_found() => Err(CoreError::VehicleNotFound {
                vehicle_no: vehicle_no.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::*;

    /// In-memory source with scripted responses.
    pub(crate) struct FakeSource {
        pub stats: std::sync::Mutex<Result<RawStatistics, u16>>,
        pub vehicles: std::sync::Mutex<Result<Vec<RawVehicle>, u16>>,
        pub unexpected_vehicles: bool,
        pub html_vehicles: bool,
        pub calls: AtomicUsize,
        pub gate: Option<Arc<Notify>>,
    }

    impl FakeSource {
        pub(crate) fn ok(vehicles: Vec<RawVehicle>) -> Self {
            Self {
                stats: std::sync::Mutex::new(Ok(RawStatistics {
                    total_entries: 2,
                    open_entries: 1,
                    closed_entries: 1,
                    unique_vehicles: 2,
                })),
                vehicles: std::sync::Mutex::new(Ok(vehicles)),
                unexpected_vehicles: false,
                html_vehicles: false,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    fn http(status: u16) -> gatelog_api::Error {
        gatelog_api::Error::Http {
            status,
            message: "scripted".into(),
        }
    }

    impl VehicleSource for FakeSource {
        async fn fetch_statistics(&self) -> Result<RawStatistics, gatelog_api::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.stats.lock().unwrap().clone().map_err(http)
        }

        async fn fetch_vehicles(&self) -> Result<Vec<RawVehicle>, gatelog_api::Error> {
            if self.unexpected_vehicles {
                return Err(gatelog_api::Error::UnexpectedResponse {
                    endpoint: "vehicles".into(),
                    status: Some("error".into()),
                });
            }
            if self.html_vehicles {
                return Err(gatelog_api::Error::InvalidJson {
                    message: "expected value at line 1 column 1".into(),
                    body: "<html>502 Bad Gateway</html>".into(),
                });
            }
            self.vehicles.lock().unwrap().clone().map_err(http)
        }

        async fn fetch_history(
            &self,
            vehicle_no: &str,
        ) -> Result<gatelog_api::VehicleHistory, gatelog_api::Error> {
            if vehicle_no == "NOPE" {
                return Err(gatelog_api::Error::NotFound {
                    message: "Vehicle not found".into(),
                });
            }
            Ok(gatelog_api::VehicleHistory {
                vehicle_no: vehicle_no.to_owned(),
                count: 1,
                entries: vec![raw(vehicle_no, "")],
            })
        }
    }

    pub(crate) fn raw(no: &str, out_time: &str) -> RawVehicle {
        RawVehicle {
            vehicle_no: no.into(),
            visitor_name: None,
            phone: None,
            purpose: None,
            in_time: "2024-03-05 09:15:00".into(),
            out_time: Some(out_time.into()),
            image_path: None,
        }
    }

    fn loader(source: FakeSource) -> Loader<FakeSource> {
        Loader::new(source, Arc::new(DataStore::new()))
    }

    #[tokio::test]
    async fn successful_refresh_populates_store() {
        let loader = loader(FakeSource::ok(vec![
            raw("KA01AB1234", ""),
            raw("KA02CD5678", "2024-03-05 10:00:00"),
        ]));

        let outcome = loader.refresh().await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Refreshed { vehicles: 2 });

        let store = loader.store();
        assert_eq!(store.load_state(), LoadState::Ready);
        assert_eq!(store.vehicle_count(), 2);
        assert_eq!(store.statistics().open_entries, 1);
        assert!(store.last_refresh().is_some());
        assert!(store.vehicles_snapshot()[0].is_inside());
    }

    #[tokio::test]
    async fn network_failure_sets_failed_state() {
        let source = FakeSource::ok(vec![raw("A", "")]);
        *source.stats.lock().unwrap() = Err(503);
        let loader = loader(source);

        let err = loader.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
        assert_eq!(
            loader.store().load_state(),
            LoadState::Failed(LoadFailure::Network)
        );
        // The vehicle fetch still succeeded and was applied.
        assert_eq!(loader.store().vehicle_count(), 1);
        assert!(loader.store().last_refresh().is_none());
    }

    #[tokio::test]
    async fn missing_success_marker_is_unexpected_response() {
        let mut source = FakeSource::ok(Vec::new());
        source.unexpected_vehicles = true;
        let loader = loader(source);

        let err = loader.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedResponse { .. }));
        assert_eq!(
            loader.store().load_state(),
            LoadState::Failed(LoadFailure::UnexpectedResponse)
        );
        assert_eq!(loader.store().statistics().total_entries, 2);
    }

    #[tokio::test]
    async fn non_json_body_shows_network_failure() {
        let mut source = FakeSource::ok(Vec::new());
        source.html_vehicles = true;
        let loader = loader(source);

        let err = loader.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::UnreadableBody { .. }));
        assert_eq!(
            loader.store().load_state(),
            LoadState::Failed(LoadFailure::Network)
        );
    }

    #[tokio::test]
    async fn recovery_after_failure() {
        let source = FakeSource::ok(vec![raw("A", "")]);
        *source.vehicles.lock().unwrap() = Err(500);
        let loader = loader(source);

        assert!(loader.refresh().await.is_err());
        *loader.source().vehicles.lock().unwrap() = Ok(vec![raw("A", ""), raw("B", "")]);
        loader.refresh().await.unwrap();
        assert_eq!(loader.store().load_state(), LoadState::Ready);
        assert_eq!(loader.store().vehicle_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_refreshes_are_coalesced() {
        let gate = Arc::new(Notify::new());
        let mut source = FakeSource::ok(vec![raw("A", "")]);
        source.gate = Some(Arc::clone(&gate));
        let loader = loader(source);

        let first = tokio::spawn({
            let loader = loader.clone();
            async move { loader.refresh().await }
        });
        // Let the first refresh take the guard and block on the gate.
        while loader.source().calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let second = tokio::spawn({
            let loader = loader.clone();
            async move { loader.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        gate.notify_one();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first, RefreshOutcome::Refreshed { vehicles: 1 });
        assert_eq!(second, RefreshOutcome::Coalesced);
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn history_maps_not_found() {
        let loader = loader(FakeSource::ok(Vec::new()));

        let history = loader.history("KA01AB1234").await.unwrap();
        assert_eq!(history.entries.len(), 1);
        assert!(history.entries[0].is_inside());

        let err = loader.history("NOPE").await.unwrap_err();
        assert!(matches!(err, CoreError::VehicleNotFound { ref vehicle_no } if vehicle_no == "NOPE"));
        assert_eq!(loader.store().vehicle_count(), 0);
    }
}
