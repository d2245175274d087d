//! Canonical contract table
//!
//! The in-memory table is the source of truth; the [`TableStorage`] copy is a
//! durable write-through. Every mutation goes through the single writer lock,
//! rewrites the whole persisted table, and discards the enriched snapshot
//! before the lock is released.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use shared::{ComponentId, ContractRecord, Coordinate, component_debug, component_info, component_warn};
use crate::core::filter::RecordFilter;
use crate::core::snapshot::SnapshotCell;
use crate::error::{EngineError, EngineResult};
use crate::traits::TableStorage;
use crate::types::{EnrichedSnapshot, FieldUpdate};

pub struct RecordStore {
    rows: RwLock<Vec<ContractRecord>>,
    storage: Arc<dyn TableStorage>,
    writer: Mutex<()>,
    snapshot: Arc<SnapshotCell>,
}

/// Exclusive write access held by the enrichment rebuild. No update can
/// interleave with the read-resolve-persist sequence while this is alive.
pub struct WriteSession<'a> {
    store: &'a RecordStore,
    _writer: MutexGuard<'a, ()>,
}

impl RecordStore {
    /// Open the table from storage. A table that was never persisted opens empty.
    pub async fn open(storage: Arc<dyn TableStorage>, snapshot: Arc<SnapshotCell>) -> EngineResult<Self> {
        let rows = storage.load().await?.unwrap_or_default();
        Ok(Self::with_rows(dedupe(rows), storage, snapshot))
    }

    /// Open the table from storage, persisting `seed` first if nothing exists yet
    pub async fn open_or_seed(
        storage: Arc<dyn TableStorage>,
        snapshot: Arc<SnapshotCell>,
        seed: Vec<ContractRecord>,
    ) -> EngineResult<Self> {
        let rows = match storage.load().await? {
            Some(rows) => dedupe(rows),
            None => {
                let seed = dedupe(seed);
                storage.save(&seed).await?;
                component_info!(
                    ComponentId::RecordStore,
                    "🌱 Initialized table at {} with {} seed rows",
                    storage.location(),
                    seed.len()
                );
                seed
            }
        };
        Ok(Self::with_rows(rows, storage, snapshot))
    }

    fn with_rows(rows: Vec<ContractRecord>, storage: Arc<dyn TableStorage>, snapshot: Arc<SnapshotCell>) -> Self {
        Self {
            rows: RwLock::new(rows),
            storage,
            writer: Mutex::new(()),
            snapshot,
        }
    }

    pub fn snapshot_cell(&self) -> &Arc<SnapshotCell> {
        &self.snapshot
    }

    pub async fn read_all(&self) -> Vec<ContractRecord> {
        self.rows.read().await.clone()
    }

    pub async fn read_filtered(&self, filter: &RecordFilter) -> Vec<ContractRecord> {
        filter.apply(self.rows.read().await.iter())
    }

    pub async fn get(&self, contract_no: &str) -> Option<ContractRecord> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| r.contract_no == contract_no)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Update one mutable field of an existing contract.
    ///
    /// The durable rewrite happens first; if it fails the in-memory table is
    /// untouched. On success the snapshot is discarded before this returns.
    pub async fn update_field(&self, contract_no: &str, update: FieldUpdate) -> EngineResult<()> {
        let _writer = self.writer.lock().await;

        let mut updated = self.rows.read().await.clone();
        let record = updated
            .iter_mut()
            .find(|r| r.contract_no == contract_no)
            .ok_or_else(|| EngineError::not_found(contract_no))?;
        update.apply(record);

        self.storage.save(&updated).await?;
        self.swap_and_invalidate(updated).await;

        component_info!(
            ComponentId::RecordStore,
            "✏️ {} set {} to {:?}",
            contract_no,
            update.column(),
            update
        );
        Ok(())
    }

    /// Replace the whole table (import path). Duplicate contract numbers keep
    /// their first occurrence.
    pub async fn replace_all(&self, records: Vec<ContractRecord>) -> EngineResult<()> {
        let _writer = self.writer.lock().await;
        let records = dedupe(records);

        self.storage.save(&records).await?;
        let count = records.len();
        self.swap_and_invalidate(records).await;

        component_info!(ComponentId::RecordStore, "📥 Replaced table with {} rows", count);
        Ok(())
    }

    /// Take the writer lock for a multi-step operation
    pub async fn begin_write(&self) -> WriteSession<'_> {
        WriteSession {
            store: self,
            _writer: self.writer.lock().await,
        }
    }

    /// Swap in new rows while holding the snapshot slot exclusively
    async fn swap_and_invalidate(&self, rows: Vec<ContractRecord>) {
        let slot = self.snapshot.lock().await;
        let mut current = self.rows.write().await;
        *current = rows;
        if slot.discard() {
            component_debug!(ComponentId::RecordStore, "Discarded enriched snapshot after write");
        }
    }
}

impl WriteSession<'_> {
    pub async fn records(&self) -> Vec<ContractRecord> {
        self.store.read_all().await
    }

    /// Record resolved coordinates for contracts that still lack them.
    ///
    /// The in-memory table is updated unconditionally so later rebuilds skip
    /// these addresses; the returned error only reports a failed durable write.
    pub async fn commit_positions(&self, resolved: &[(String, Coordinate)]) -> EngineResult<usize> {
        if resolved.is_empty() {
            return Ok(0);
        }

        let (rows, applied) = {
            let mut rows = self.store.rows.write().await;
            let mut applied = 0;
            for (contract_no, position) in resolved {
                if let Some(row) = rows
                    .iter_mut()
                    .find(|r| &r.contract_no == contract_no && r.position.is_none())
                {
                    row.position = Some(*position);
                    applied += 1;
                }
            }
            (rows.clone(), applied)
        };

        self.store.storage.save(&rows).await?;
        component_debug!(ComponentId::RecordStore, "📍 Persisted {} resolved coordinates", applied);
        Ok(applied)
    }

    /// Publish a freshly built snapshot while still holding the writer lock
    pub async fn install(&self, snapshot: Arc<EnrichedSnapshot>) {
        self.store.snapshot.install(snapshot).await;
    }

    pub fn storage_location(&self) -> String {
        self.store.storage.location()
    }
}

/// Keep the first row per contract number
fn dedupe(rows: Vec<ContractRecord>) -> Vec<ContractRecord> {
    let mut seen = HashSet::new();
    let total = rows.len();
    let unique: Vec<ContractRecord> = rows
        .into_iter()
        .filter(|r| seen.insert(r.contract_no.clone()))
        .collect();
    if unique.len() != total {
        component_warn!(
            ComponentId::RecordStore,
            "Dropped {} rows with duplicate contract numbers",
            total - unique.len()
        );
    }
    unique
}
