//! In-memory vault backend for testing
//!
//! Ephemeral file storage that exists only in memory, so sync-engine tests
//! can exercise read-modify-write cycles without touching disk.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::backend::{FileInfo, VaultBackend};

#[derive(Clone, Debug)]
struct MemoryFile {
    data: Vec<u8>,
    modified: SystemTime,
}

/// In-memory vault backend
///
/// All data is lost when the vault is dropped. Thread-safe via an internal
/// `RwLock`; directories are implicit (a file at `a/b.md` makes `a` listable).
pub struct MemoryVault {
    files: Arc<RwLock<HashMap<String, MemoryFile>>>,
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVault {
    /// Create a new empty in-memory vault
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create with initial file contents
    pub fn with_files(files: Vec<(&str, &[u8])>) -> Self {
        let vault = Self::new();
        {
            let mut map = vault.files.write().unwrap();
            for (path, content) in files {
                map.insert(
                    Self::normalize(path),
                    MemoryFile {
                        data: content.to_vec(),
                        modified: SystemTime::now(),
                    },
                );
            }
        }
        vault
    }

    /// Number of files currently stored
    pub fn file_count(&self) -> usize {
        self.files.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Normalize path (no leading slash, no trailing slash)
    fn normalize(path: &str) -> String {
        path.trim().trim_matches('/').to_string()
    }
}

#[async_trait]
impl VaultBackend for MemoryVault {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = Self::normalize(path);
        let files = self.files.read().map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
        match files.get(&path) {
            Some(file) => Ok(file.data.clone()),
            None => bail!("File not found: {path}"),
        }
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let path = Self::normalize(path);
        let mut files = self.files.write().map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
        files.insert(
            path,
            MemoryFile {
                data: data.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn stat(&self, path: &str) -> Result<FileInfo> {
        let path = Self::normalize(path);
        let files = self.files.read().map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
        if let Some(file) = files.get(&path) {
            return Ok(FileInfo {
                is_file: true,
                size: file.data.len() as u64,
                modified: Some(file.modified),
            });
        }
        // Implicit directory: some file lives underneath
        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        if files.keys().any(|k| k.starts_with(&prefix)) {
            return Ok(FileInfo::dir());
        }
        bail!("Not found: {path}")
    }

    async fn list(&self, path: &str) -> Result<Vec<String>> {
        let dir = Self::normalize(path);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        let files = self.files.read().map_err(|_| anyhow::anyhow!("Lock poisoned"))?;
        let mut names: Vec<String> = files
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|rest| match rest.find('/') {
                Some(idx) => rest[..idx].to_string(),
                None => rest.to_string(),
            })
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
