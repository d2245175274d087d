//! Test helpers and builder patterns for engine tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use engine::{EngineConfig, GeocodeFailure, LocationEngine, MemoryTableStorage, MockGeocoder, RoutePlan};
use shared::{ContractRecord, Coordinate};

/// Builder for engines wired to in-memory storage and a mock geocoder
pub struct EngineBuilder {
    config: EngineConfig,
    rows: Option<Vec<ContractRecord>>,
    geocoder: MockGeocoder,
}

impl EngineBuilder {
    /// Empty table, and a geocoder that must never be called
    pub fn new() -> Self {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_resolve().never();

        Self {
            config: EngineConfig::default(),
            rows: None,
            geocoder,
        }
    }

    pub fn with_rows(mut self, rows: Vec<ContractRecord>) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_route_cap(mut self, cap: usize) -> Self {
        self.config.route_cap = cap;
        self
    }

    /// Replace the geocoder mock with one configured by `setup`
    pub fn with_geocoder<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockGeocoder),
    {
        let mut geocoder = MockGeocoder::new();
        setup(&mut geocoder);
        self.geocoder = geocoder;
        self
    }

    pub async fn build(self) -> (LocationEngine, Arc<MemoryTableStorage>) {
        let storage = Arc::new(match self.rows {
            Some(rows) => MemoryTableStorage::with_rows(rows),
            None => MemoryTableStorage::new(),
        });
        let engine = LocationEngine::with_services(self.config, storage.clone(), Arc::new(self.geocoder))
            .await
            .unwrap();
        (engine, storage)
    }
}

/// Common setup and assertion helpers
pub struct TestHelpers;

impl TestHelpers {
    /// Geocoder setup that resolves from a fixed table and counts every call
    pub fn lookup_geocoder(
        table: Vec<(&'static str, Coordinate)>,
        calls: Arc<AtomicUsize>,
    ) -> impl FnOnce(&mut MockGeocoder) {
        move |geocoder| {
            geocoder.expect_resolve().returning(move |address| {
                calls.fetch_add(1, Ordering::SeqCst);
                table
                    .iter()
                    .find(|(known, _)| *known == address)
                    .map(|(_, position)| *position)
                    .ok_or(GeocodeFailure::NoMatch)
            });
        }
    }

    pub fn contract_numbers(plan: &RoutePlan) -> Vec<String> {
        plan.stops.iter().map(|stop| stop.record.contract_no.clone()).collect()
    }
}
