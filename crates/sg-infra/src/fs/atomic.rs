use std::ffi::OsString;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create dir failed: {}", dir.display()))?;
    }
    Ok(())
}

/// Writes to a sibling temp file, then renames over `path`.
///
/// Readers observe either the old or the new content, never a prefix.
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path).await?;

    let mut tmp_name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("serigy"));
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)
        .await
        .with_context(|| format!("write temp file failed: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!(
            "rename temp file to target failed: {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}
