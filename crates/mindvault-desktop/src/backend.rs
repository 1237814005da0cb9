//! File backends

use async_trait::async_trait;
use mindvault_core::{Error, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Contents returned by [`MockBackend`] for paths it has never written
pub const MOCK_FILE_CONTENTS: &[u8] = b"Mind Vault mock file contents";

/// Entry returned by a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

/// Storage backend behind the file system facade
#[async_trait]
pub trait FileBackend: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;

    async fn delete_file(&self, path: &Path) -> Result<()>;

    async fn create_dir(&self, path: &Path) -> Result<()>;

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    async fn remove_dir(&self, path: &Path) -> Result<()>;

    async fn exists(&self, path: &Path) -> bool;

    /// Backend name (for display)
    fn name(&self) -> &'static str;
}

/// In-memory backend with deterministic results.
///
/// Reads of unknown paths return [`MOCK_FILE_CONTENTS`]; writes are kept so
/// later reads see them. Every call is appended to an operation log.
#[derive(Debug, Default)]
pub struct MockBackend {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
    operations: RwLock<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations performed so far, e.g. `read /a.txt`
    pub fn operations(&self) -> Vec<String> {
        self.operations.read().clone()
    }

    fn log(&self, op: &str, path: &Path) {
        self.operations
            .write()
            .push(format!("{} {}", op, path.display()));
    }
}

#[async_trait]
impl FileBackend for MockBackend {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.log("read", path);
        Ok(self
            .files
            .read()
            .get(path)
            .cloned()
            .unwrap_or_else(|| MOCK_FILE_CONTENTS.to_vec()))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.log("write", path);
        self.files.write().insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        self.log("delete", path);
        self.files.write().remove(path);
        Ok(())
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        self.log("mkdir", path);
        self.dirs.write().insert(path.to_path_buf());
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.log("readdir", path);
        let mut entries: Vec<DirEntry> = self
            .files
            .read()
            .iter()
            .filter(|(p, _)| p.parent() == Some(path))
            .map(|(p, data)| DirEntry {
                name: file_name(p),
                path: p.clone(),
                is_dir: false,
                size: data.len() as u64,
            })
            .collect();
        entries.extend(
            self.dirs
                .read()
                .iter()
                .filter(|p| p.parent() == Some(path))
                .map(|p| DirEntry {
                    name: file_name(p),
                    path: p.clone(),
                    is_dir: true,
                    size: 0,
                }),
        );
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn remove_dir(&self, path: &Path) -> Result<()> {
        self.log("rmdir", path);
        self.dirs.write().retain(|p| !p.starts_with(path));
        self.files.write().retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    async fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path) || self.dirs.read().contains(path)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Backend on the local disk via tokio::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalBackend;

fn not_found(path: &Path, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::FileNotFound(path.to_path_buf())
    } else {
        Error::IoError(e)
    }
}

#[async_trait]
impl FileBackend for LocalBackend {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| not_found(path, e))
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| not_found(path, e))
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|e| not_found(path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.path(),
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn remove_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(path)
            .await
            .map_err(|e| not_found(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_mock_read_unknown_returns_constant() {
        let backend = MockBackend::new();
        let data = backend.read_file(Path::new("/nowhere.txt")).await.unwrap();
        assert_eq!(data, MOCK_FILE_CONTENTS);
    }

    #[tokio::test]
    async fn test_mock_write_then_read() {
        let backend = MockBackend::new();
        let path = Path::new("/notes/a.md");
        backend.write_file(path, b"# hello").await.unwrap();
        assert_eq!(backend.read_file(path).await.unwrap(), b"# hello");
        assert!(backend.exists(path).await);

        backend.delete_file(path).await.unwrap();
        assert!(!backend.exists(path).await);
        assert_eq!(
            backend.operations(),
            vec!["write /notes/a.md", "read /notes/a.md", "delete /notes/a.md"]
        );
    }

    #[tokio::test]
    async fn test_mock_read_dir() {
        let backend = MockBackend::new();
        backend.write_file(Path::new("/lib/b.epub"), b"12").await.unwrap();
        backend.write_file(Path::new("/lib/a.pdf"), b"1").await.unwrap();
        backend.create_dir(Path::new("/lib/sub")).await.unwrap();
        backend.write_file(Path::new("/other/c.txt"), b"").await.unwrap();

        let entries = backend.read_dir(Path::new("/lib")).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.epub", "sub"]);
        assert!(entries[2].is_dir);
        assert_eq!(entries[1].size, 2);

        backend.remove_dir(Path::new("/lib")).await.unwrap();
        assert!(backend.read_dir(Path::new("/lib")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_roundtrip() {
        let dir = tempdir().unwrap();
        let backend = LocalBackend;
        let path = dir.path().join("nested").join("file.txt");

        backend.write_file(&path, b"content").await.unwrap();
        assert!(backend.exists(&path).await);
        assert_eq!(backend.read_file(&path).await.unwrap(), b"content");

        let entries = backend.read_dir(dir.path()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir);

        backend.delete_file(&path).await.unwrap();
        assert!(!backend.exists(&path).await);
    }

    #[tokio::test]
    async fn test_local_missing_file() {
        let dir = tempdir().unwrap();
        let result = LocalBackend.read_file(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
