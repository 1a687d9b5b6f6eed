// src/core/fs_ops.rs
//! File system helpers shared by the session store, uploads and exports

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !fs::try_exists(path).await.unwrap_or(false) {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn file_exists(path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write text, creating parent directories first
    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes()).await
    }

    pub async fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        debug!("Written file: {}", path.display());
        Ok(())
    }

    /// Remove a file; a missing file is not an error
    pub async fn remove_file(path: &Path) -> Result<()> {
        if Self::file_exists(path).await {
            fs::remove_file(path)
                .await
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
            info!("Removed file: {}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parents_and_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("file.txt");

        FsOps::write_file_safe(&path, "hello").await.unwrap();
        assert!(FsOps::file_exists(&path).await);
        assert_eq!(FsOps::read_file_safe(&path).await.unwrap(), "hello");

        FsOps::remove_file(&path).await.unwrap();
        assert!(!FsOps::file_exists(&path).await);
        FsOps::remove_file(&path).await.unwrap();
    }
}
