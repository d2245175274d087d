//! Volatile table storage for hosts that keep no durable copy

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared::ContractRecord;
use crate::error::EngineResult;
use crate::traits::TableStorage;

/// Keeps the "persisted" table in memory. Also counts saves, which tests use
/// to observe write-through behaviour.
#[derive(Default)]
pub struct MemoryTableStorage {
    rows: RwLock<Option<Vec<ContractRecord>>>,
    saves: RwLock<usize>,
}

impl MemoryTableStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-persisted table
    pub fn with_rows(rows: Vec<ContractRecord>) -> Self {
        Self {
            rows: RwLock::new(Some(rows)),
            saves: RwLock::new(0),
        }
    }

    /// Rows as last saved
    pub async fn persisted(&self) -> Option<Vec<ContractRecord>> {
        self.rows.read().await.clone()
    }

    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl TableStorage for MemoryTableStorage {
    async fn load(&self) -> EngineResult<Option<Vec<ContractRecord>>> {
        Ok(self.rows.read().await.clone())
    }

    async fn save(&self, rows: &[ContractRecord]) -> EngineResult<()> {
        *self.rows.write().await = Some(rows.to_vec());
        *self.saves.write().await += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
