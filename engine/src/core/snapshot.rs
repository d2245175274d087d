//! Shared slot holding the current enriched snapshot
//!
//! The record store clears the slot inside its write critical section; the
//! enrichment cache fills it after a rebuild. Readers only take the read lock.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tokio::time::Instant;

use crate::types::EnrichedSnapshot;

#[derive(Debug)]
struct CachedSnapshot {
    snapshot: Arc<EnrichedSnapshot>,
    built_at: Instant,
}

#[derive(Debug, Default)]
pub struct SnapshotCell {
    slot: RwLock<Option<CachedSnapshot>>,
}

/// Exclusive hold on the slot, taken before the row table is swapped so the
/// swap and the discard are observed together
pub struct InvalidationGuard<'a> {
    slot: RwLockWriteGuard<'a, Option<CachedSnapshot>>,
}

impl InvalidationGuard<'_> {
    /// Drop the held snapshot. Returns whether one was present.
    pub fn discard(mut self) -> bool {
        self.slot.take().is_some()
    }
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot if one exists and is younger than `ttl`
    pub async fn current(&self, ttl: Duration) -> Option<Arc<EnrichedSnapshot>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| cached.built_at.elapsed() < ttl)
            .map(|cached| Arc::clone(&cached.snapshot))
    }

    pub async fn install(&self, snapshot: Arc<EnrichedSnapshot>) {
        *self.slot.write().await = Some(CachedSnapshot {
            snapshot,
            built_at: Instant::now(),
        });
    }

    /// Unconditionally discard the snapshot
    pub async fn invalidate(&self) -> bool {
        self.lock().await.discard()
    }

    pub async fn lock(&self) -> InvalidationGuard<'_> {
        InvalidationGuard {
            slot: self.slot.write().await,
        }
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
