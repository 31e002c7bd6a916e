use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::backend::{FileInfo, VaultBackend};

/// Local filesystem vault - maps vault-relative paths to a real directory
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    /// Create a local vault rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root_path = root.into();
        // Ensure the root exists and canonicalize it for containment checks
        let _ = fs::create_dir_all(&root_path);
        Self {
            root: root_path.canonicalize().unwrap_or(root_path),
        }
    }

    /// Resolve a vault path to a filesystem path, creating parents for writes
    ///
    /// Canonicalizes and verifies the result stays inside the vault root so
    /// `../` segments cannot escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let target = self.root.join(path.trim_start_matches('/'));

        let resolved = if target.exists() {
            target.canonicalize()?
        } else {
            let parent = target
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Invalid path: no parent"))?;
            fs::create_dir_all(parent)?;
            let canonical_parent = parent.canonicalize()?;
            canonical_parent.join(
                target
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid path: no filename"))?,
            )
        };

        if !resolved.starts_with(&self.root) {
            bail!(
                "Path traversal blocked: {} escapes vault {}",
                path,
                self.root.display()
            );
        }

        Ok(resolved)
    }
}

#[async_trait]
impl VaultBackend for LocalVault {
    async fn read(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(path)?;
        tokio::task::spawn_blocking(move || fs::read(resolved).map_err(Into::into)).await?
    }

    async fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let resolved = self.resolve(path)?;
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || fs::write(resolved, data).map_err(Into::into)).await?
    }

    async fn stat(&self, path: &str) -> Result<FileInfo> {
        let resolved = self.resolve(path)?;
        tokio::task::spawn_blocking(move || {
            let meta = fs::metadata(&resolved)?;
            Ok(FileInfo {
                is_file: meta.is_file(),
                size: meta.len(),
                modified: meta.modified().ok(),
            })
        })
        .await?
    }

    async fn list(&self, path: &str) -> Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        tokio::task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in fs::read_dir(resolved)? {
                let entry = entry?;
                entries.push(entry.file_name().to_string_lossy().into_owned());
            }
            Ok(entries)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn read_write_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        vault.write("note.md", b"hello world").await.unwrap();
        let content = vault.read("note.md").await.unwrap();

        assert_eq!(content, b"hello world");
    }

    #[tokio::test]
    async fn write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        vault.write("a/b/c/note.md", b"nested").await.unwrap();
        let content = vault.read("a/b/c/note.md").await.unwrap();

        assert_eq!(content, b"nested");
    }

    #[tokio::test]
    async fn read_nonexistent_fails() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        assert!(vault.read("missing.md").await.is_err());
    }

    #[tokio::test]
    async fn leading_slash_is_vault_relative() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        vault.write("/canvases/Board.canvas", b"{}").await.unwrap();
        assert!(vault.exists("canvases/Board.canvas").await.unwrap());
    }

    #[tokio::test]
    async fn traversal_cannot_escape_root() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        let result = vault.write("../../outside.md", b"escape").await;

        assert!(result.is_err());
        assert!(!tmp.path().parent().unwrap().join("outside.md").exists());
    }

    #[tokio::test]
    async fn stat_reports_size_and_mtime() {
        let tmp = TempDir::new().unwrap();
        let vault = LocalVault::new(tmp.path());

        vault.write("note.md", b"content").await.unwrap();
        let info = vault.stat("note.md").await.unwrap();

        assert!(info.is_file);
        assert_eq!(info.size, 7);
        assert!(info.modified.is_some());
    }
}
