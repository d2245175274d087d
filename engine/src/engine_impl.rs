//! Location engine with dependency injection
//!
//! Wires the record store, the enrichment cache and the route planner behind
//! one handle. The production constructor uses the JSON table file and the
//! rate-limited HTTP geocoder; tests inject their own services.

use std::sync::Arc;

use shared::{ComponentId, ContractRecord, Coordinate, logging};
use crate::config::EngineConfig;
use crate::core::{
    EnrichmentCache, FieldMapping, ImportReport, RawRow, RecordFilter, RecordStore, RoutePlan, SnapshotCell,
    demo_records, fallback_origin, normalize_rows, plan_route, summarize,
};
use crate::error::EngineResult;
use crate::services::{JsonTableStorage, NominatimGeocoder};
use crate::traits::{Geocoder, TableStorage};
use crate::types::{EnrichedSnapshot, FieldUpdate, StatusSummary};

pub struct LocationEngine {
    config: EngineConfig,
    store: Arc<RecordStore>,
    cache: EnrichmentCache,
}

impl LocationEngine {
    /// Open the engine on the configured table file, seeding the demo
    /// contracts when the file does not exist yet.
    pub async fn open(config: EngineConfig) -> EngineResult<Self> {
        let storage: Arc<dyn TableStorage> = Arc::new(JsonTableStorage::new(&config.table_path));
        let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
        let store = RecordStore::open_or_seed(storage, Arc::new(SnapshotCell::new()), demo_records()).await?;
        Ok(Self::assemble(config, store, geocoder).await)
    }

    /// Open the engine on injected services. A table that was never persisted
    /// opens empty.
    pub async fn with_services(
        config: EngineConfig,
        storage: Arc<dyn TableStorage>,
        geocoder: Arc<dyn Geocoder>,
    ) -> EngineResult<Self> {
        let store = RecordStore::open(storage, Arc::new(SnapshotCell::new())).await?;
        Ok(Self::assemble(config, store, geocoder).await)
    }

    async fn assemble(config: EngineConfig, store: RecordStore, geocoder: Arc<dyn Geocoder>) -> Self {
        let store = Arc::new(store);
        let cache = EnrichmentCache::new(Arc::clone(&store), geocoder, config.snapshot_ttl);

        logging::log_startup(
            ComponentId::Engine,
            &format!(
                "location engine with {} contracts from {:?}, snapshot TTL {:?}, route cap {}",
                store.len().await,
                config.table_path,
                config.snapshot_ttl,
                config.route_cap
            ),
        );

        Self { config, store, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn read_all(&self) -> Vec<ContractRecord> {
        self.store.read_all().await
    }

    pub async fn read_filtered(&self, filter: &RecordFilter) -> Vec<ContractRecord> {
        self.store.read_filtered(filter).await
    }

    pub async fn get(&self, contract_no: &str) -> Option<ContractRecord> {
        self.store.get(contract_no).await
    }

    pub async fn update_field(&self, contract_no: &str, update: FieldUpdate) -> EngineResult<()> {
        self.store.update_field(contract_no, update).await
    }

    /// Update from a `(field name, value)` pair, e.g. `("Status", "완료")`
    pub async fn update_field_by_name(&self, contract_no: &str, field: &str, value: &str) -> EngineResult<()> {
        let update = FieldUpdate::parse(field, value)?;
        self.store.update_field(contract_no, update).await
    }

    pub async fn get_enriched(&self) -> EngineResult<Arc<EnrichedSnapshot>> {
        self.cache.get_enriched().await
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await
    }

    /// Plan a visiting order over the enriched records matching `filter`.
    ///
    /// Without an agent position the origin falls back to a point just
    /// south-west of the first located record, or the configured default.
    pub async fn plan_route(&self, origin: Option<Coordinate>, filter: &RecordFilter) -> EngineResult<RoutePlan> {
        let snapshot = self.cache.get_enriched().await?;
        let records = filter.apply(snapshot.records.iter());
        let origin = origin.unwrap_or_else(|| fallback_origin(&records, self.config.default_origin));
        Ok(plan_route(origin, &records, self.config.route_cap))
    }

    /// Replace the whole table with normalized `rows`
    pub async fn import_rows(&self, rows: &[RawRow], mapping: &FieldMapping) -> EngineResult<ImportReport> {
        let (records, report) = normalize_rows(rows, mapping);
        self.store.replace_all(records).await?;
        Ok(report)
    }

    pub async fn summary(&self) -> StatusSummary {
        summarize(&self.store.read_all().await)
    }
}
