//! Enrichment cache: memoized, coordinate-complete view of the record store
//!
//! A rebuild holds the store's writer lock for its whole duration, resolves
//! missing coordinates one address at a time through the shared geocoder, and
//! writes every success back to the store so no later rebuild asks again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use shared::{ComponentId, Coordinate, component_debug, component_info, component_warn, logging};
use crate::core::record_store::{RecordStore, WriteSession};
use crate::error::EngineResult;
use crate::traits::Geocoder;
use crate::types::EnrichedSnapshot;

pub struct EnrichmentCache {
    store: Arc<RecordStore>,
    geocoder: Arc<dyn Geocoder>,
    ttl: Duration,
}

impl EnrichmentCache {
    pub fn new(store: Arc<RecordStore>, geocoder: Arc<dyn Geocoder>, ttl: Duration) -> Self {
        Self { store, geocoder, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the current snapshot, rebuilding it if it was invalidated or
    /// has outlived the TTL.
    pub async fn get_enriched(&self) -> EngineResult<Arc<EnrichedSnapshot>> {
        let cell = self.store.snapshot_cell();
        if let Some(snapshot) = cell.current(self.ttl).await {
            return Ok(snapshot);
        }

        let session = self.store.begin_write().await;

        // Another caller may have rebuilt while this one waited for the lock
        if let Some(snapshot) = cell.current(self.ttl).await {
            return Ok(snapshot);
        }

        let snapshot = Arc::new(self.rebuild(&session).await?);
        session.install(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Discard the current snapshot; the next read rebuilds.
    ///
    /// Waits for an in-flight rebuild, whose install would otherwise land
    /// after the discard and keep its unresolved addresses cached.
    pub async fn invalidate(&self) {
        let _session = self.store.begin_write().await;
        if self.store.snapshot_cell().invalidate().await {
            component_debug!(ComponentId::EnrichmentCache, "Snapshot invalidated");
        }
    }

    async fn rebuild(&self, session: &WriteSession<'_>) -> EngineResult<EnrichedSnapshot> {
        let mut records = session.records().await;
        let missing = records.iter().filter(|r| !r.is_located()).count();
        component_info!(
            ComponentId::EnrichmentCache,
            "🔄 Rebuilding snapshot: {} records, {} missing coordinates",
            records.len(),
            missing
        );

        // Same address twice in one pass costs one call
        let mut outcomes: HashMap<String, Option<Coordinate>> = HashMap::new();
        let mut resolved = Vec::new();
        let mut calls = 0;

        for record in records.iter_mut().filter(|r| !r.is_located()) {
            let key = record.address.trim().to_string();
            let outcome = match outcomes.get(&key) {
                Some(outcome) => *outcome,
                None => {
                    calls += 1;
                    let outcome = match self.geocoder.resolve(&record.address).await {
                        Ok(position) => Some(position),
                        Err(failure) => {
                            component_warn!(
                                ComponentId::EnrichmentCache,
                                contract_no = %record.contract_no,
                                "📍 Could not locate '{}': {}",
                                record.address,
                                failure
                            );
                            None
                        }
                    };
                    outcomes.insert(key, outcome);
                    outcome
                }
            };

            if let Some(position) = outcome {
                record.position = Some(position);
                resolved.push((record.contract_no.clone(), position));
            }
        }

        if let Err(e) = session.commit_positions(&resolved).await {
            // The in-memory table already holds the coordinates
            logging::log_error(
                ComponentId::EnrichmentCache,
                &format!("Persisting resolved coordinates to {}", session.storage_location()),
                &e,
            );
        }

        let snapshot = EnrichedSnapshot::new(records, calls);
        component_info!(
            ComponentId::EnrichmentCache,
            "✅ Snapshot {} ready: {} resolved, {} unresolved, {} geocoder calls",
            snapshot.id,
            resolved.len(),
            snapshot.unresolved,
            calls
        );
        Ok(snapshot)
    }
}
