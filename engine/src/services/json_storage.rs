//! File-backed contract table
//!
//! The table is a single JSON array of row objects keyed by the schema column
//! names. Saves write a sibling temp file and rename it over the table so a
//! crash never leaves a half-written table behind.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use shared::{ComponentId, ContractRecord, component_debug};
use crate::error::{EngineError, EngineResult};
use crate::traits::TableStorage;

/// Real table storage on the local file system
pub struct JsonTableStorage {
    path: PathBuf,
}

impl JsonTableStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `content` to `temp_path`, flush it, then rename it over `path`
    async fn write_and_swap(temp_path: &Path, path: &Path, content: &[u8]) -> EngineResult<()> {
        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| EngineError::storage("create", temp_path.display(), e))?;
        file.write_all(content)
            .await
            .map_err(|e| EngineError::storage("write", temp_path.display(), e))?;
        file.sync_all()
            .await
            .map_err(|e| EngineError::storage("sync", temp_path.display(), e))?;
        drop(file);

        fs::rename(temp_path, path)
            .await
            .map_err(|e| EngineError::storage("rename", path.display(), e))
    }
}

#[async_trait]
impl TableStorage for JsonTableStorage {
    async fn load(&self) -> EngineResult<Option<Vec<ContractRecord>>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(EngineError::storage("read", self.path.display(), e)),
        };

        let rows: Vec<ContractRecord> = serde_json::from_str(&content)
            .map_err(|e| EngineError::storage("parse", self.path.display(), e))?;

        component_debug!(ComponentId::RecordStore, "📂 Loaded {} rows from {}", rows.len(), self.path.display());
        Ok(Some(rows))
    }

    async fn save(&self, rows: &[ContractRecord]) -> EngineResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| EngineError::storage("create_dir", parent.display(), e))?;
            }
        }

        let content = serde_json::to_vec_pretty(rows)?;
        let temp_path = self.temp_path();

        if let Err(e) = Self::write_and_swap(&temp_path, &self.path, &content).await {
            // Leave no partial sibling behind
            fs::remove_file(&temp_path).await.ok();
            return Err(e);
        }

        component_debug!(ComponentId::RecordStore, "💾 Wrote {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
