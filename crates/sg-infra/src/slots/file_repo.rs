use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sg_core::ports::SlotRepositoryPort;
use sg_core::slot::PersistedSlot;
use tokio::fs;

use crate::fs::atomic_write;

/// Slot array stored as a JSON array of string arrays.
pub struct FileSlotRepository {
    path: PathBuf,
}

impl FileSlotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SlotRepositoryPort for FileSlotRepository {
    async fn load_slots(&self) -> Result<Vec<PersistedSlot>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read slots failed: {}", self.path.display()))
            }
        };
        serde_json::from_str(&content)
            .with_context(|| format!("parse slots failed: {}", self.path.display()))
    }

    async fn save_slots(&self, slots: &[PersistedSlot]) -> Result<()> {
        let content = serde_json::to_vec(slots).context("serialize slots failed")?;
        atomic_write(&self.path, &content).await
    }
}
