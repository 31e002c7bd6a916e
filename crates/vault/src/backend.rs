use std::time::SystemTime;

use anyhow::Result;
use async_trait::async_trait;

/// File metadata returned by stat operations
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub is_file: bool,
    pub size: u64,
    /// Last modification time (if the backend tracks it)
    pub modified: Option<SystemTime>,
}

impl FileInfo {
    /// Metadata for a plain file of known size
    pub fn file(size: u64) -> Self {
        Self {
            is_file: true,
            size,
            modified: None,
        }
    }

    /// Metadata for a directory
    pub fn dir() -> Self {
        Self {
            is_file: false,
            size: 0,
            modified: None,
        }
    }
}

/// Vault backend trait - all document and canvas file access goes through this
///
/// Paths are vault-relative, `/`-separated, with or without a leading slash.
/// Backends normalize internally; callers never see absolute host paths.
#[async_trait]
pub trait VaultBackend: Send + Sync {
    /// Read entire file contents
    async fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Write entire file contents (create or overwrite, parents created)
    async fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Get file metadata
    async fn stat(&self, path: &str) -> Result<FileInfo>;

    /// List entry basenames directly under a directory
    async fn list(&self, path: &str) -> Result<Vec<String>>;

    /// Check whether a path resolves to anything
    async fn exists(&self, path: &str) -> Result<bool> {
        match self.stat(path).await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}
