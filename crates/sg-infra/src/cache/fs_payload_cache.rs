use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sg_core::ports::PayloadCachePort;
use tokio::fs;
use tracing::debug;

use crate::fs::atomic_write;

/// Payload cache backed by a flat directory.
pub struct FsPayloadCache {
    root: PathBuf,
}

impl FsPayloadCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn checked_path(&self, file_name: &str) -> Result<PathBuf> {
        let valid = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        if !valid {
            bail!("invalid cache file name: {:?}", file_name);
        }
        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl PayloadCachePort for FsPayloadCache {
    async fn contains(&self, file_name: &str) -> Result<bool> {
        let path = self.checked_path(file_name)?;
        fs::try_exists(&path)
            .await
            .with_context(|| format!("stat cache file failed: {}", path.display()))
    }

    async fn write_if_absent(&self, file_name: &str, bytes: &[u8]) -> Result<bool> {
        let path = self.checked_path(file_name)?;
        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(file_name, "Payload already cached");
            return Ok(false);
        }
        atomic_write(&path, bytes).await?;
        Ok(true)
    }

    async fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.checked_path(file_name)?;
        fs::read(&path)
            .await
            .with_context(|| format!("read cache file failed: {}", path.display()))
    }

    async fn remove(&self, file_name: &str) -> Result<bool> {
        let path = self.checked_path(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("remove cache file failed: {}", path.display()))
            }
        }
    }

    fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}
