//! File system facade

use mindvault_core::{Error, Result, SUPPORTED_EBOOK_EXTENSIONS};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::{DirEntry, FileBackend};
use crate::export::{render, ExportFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EbookFormat {
    Epub,
    Mobi,
    Pdf,
    Txt,
    Markdown,
}

impl EbookFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if !SUPPORTED_EBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        match ext.as_str() {
            "epub" => Some(EbookFormat::Epub),
            "mobi" => Some(EbookFormat::Mobi),
            "pdf" => Some(EbookFormat::Pdf),
            "txt" => Some(EbookFormat::Txt),
            "md" => Some(EbookFormat::Markdown),
            _ => None,
        }
    }
}

/// Outcome of an ebook import. Failures are reported here, not as errors.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub book_id: Option<String>,
    pub title: Option<String>,
    pub format: Option<EbookFormat>,
    pub size: u64,
    pub error: Option<String>,
}

impl ImportResult {
    fn imported(book_id: String, title: String, format: EbookFormat, size: u64) -> Self {
        Self {
            success: true,
            book_id: Some(book_id),
            title: Some(title),
            format: Some(format),
            size,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            book_id: None,
            title: None,
            format: None,
            size: 0,
            error: Some(error.into()),
        }
    }
}

/// File operations over a pluggable backend
pub struct FileSystem {
    backend: Arc<dyn FileBackend>,
    watched: RwLock<HashMap<String, PathBuf>>,
}

impl FileSystem {
    pub fn new(backend: Arc<dyn FileBackend>) -> Self {
        Self {
            backend,
            watched: RwLock::new(HashMap::new()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.backend.read_file(path).await
    }

    pub async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.backend.write_file(path, data).await
    }

    pub async fn delete_file(&self, path: &Path) -> Result<()> {
        self.backend.delete_file(path).await
    }

    /// Read the source and write it to the destination
    pub async fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        let data = self.read_file(from).await?;
        self.write_file(to, &data).await?;
        debug!("Copied {} -> {}", from.display(), to.display());
        Ok(())
    }

    /// Copy, then delete the source
    pub async fn move_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.copy_file(from, to).await?;
        self.delete_file(from).await
    }

    pub async fn create_directory(&self, path: &Path) -> Result<()> {
        self.backend.create_dir(path).await
    }

    pub async fn read_directory(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.backend.read_dir(path).await
    }

    pub async fn delete_directory(&self, path: &Path) -> Result<()> {
        self.backend.remove_dir(path).await
    }

    pub async fn exists(&self, path: &Path) -> bool {
        self.backend.exists(path).await
    }

    /// Register a watch on a path and return its id.
    ///
    /// Only the registration is kept; no change events are delivered.
    pub fn watch_file(&self, path: &Path) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.watched.write().insert(id.clone(), path.to_path_buf());
        debug!("Watching {} ({})", path.display(), id);
        id
    }

    pub fn unwatch_file(&self, watch_id: &str) -> bool {
        self.watched.write().remove(watch_id).is_some()
    }

    pub fn watched_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.watched.read().values().cloned().collect();
        paths.sort();
        paths
    }

    /// Import an ebook. Unsupported extensions and unreadable files produce a
    /// failed result.
    pub async fn import_ebook(&self, path: &Path) -> ImportResult {
        let Some(format) = EbookFormat::from_path(path) else {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            warn!("Rejected ebook import of {}: unsupported format", path.display());
            let error = Error::UnsupportedEbook(format!(
                ".{} (expected one of: {})",
                ext,
                SUPPORTED_EBOOK_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{}", e))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
            return ImportResult::failed(error.to_string());
        };

        let data = match self.read_file(path).await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read ebook {}: {}", path.display(), e);
                return ImportResult::failed(e.to_string());
            }
        };

        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());
        let book_id = uuid::Uuid::new_v4().to_string();

        info!("Imported {} as {} ({:?}, {} bytes)", path.display(), book_id, format, data.len());
        ImportResult::imported(book_id, title, format, data.len() as u64)
    }

    /// Render `data` in `format`, write it to `path` and return the rendered
    /// content. Unknown formats fail with `Error::UnsupportedFormat`.
    pub async fn export_data(
        &self,
        data: &serde_json::Value,
        path: &Path,
        format: &str,
    ) -> Result<String> {
        let format: ExportFormat = format.parse()?;
        let content = render(data, format)?;
        self.write_file(path, content.as_bytes()).await?;
        info!("Exported {} bytes as {} to {}", content.len(), format, path.display());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LocalBackend, MockBackend, MOCK_FILE_CONTENTS};
    use serde_json::json;
    use tempfile::tempdir;

    fn mock_fs() -> (FileSystem, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new());
        (FileSystem::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_import_unsupported_extension() {
        let (fs, _) = mock_fs();
        let result = fs.import_ebook(Path::new("/x/file.xyz")).await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Unsupported ebook format: .xyz"));
        assert!(result.book_id.is_none());
    }

    #[tokio::test]
    async fn test_import_supported_extension() {
        let (fs, _) = mock_fs();
        let result = fs.import_ebook(Path::new("/x/file.epub")).await;
        assert!(result.success);
        assert!(result.book_id.is_some());
        assert_eq!(result.title.as_deref(), Some("file"));
        assert_eq!(result.format, Some(EbookFormat::Epub));
        assert_eq!(result.size, MOCK_FILE_CONTENTS.len() as u64);
    }

    #[tokio::test]
    async fn test_import_extension_case_insensitive() {
        let (fs, _) = mock_fs();
        assert!(fs.import_ebook(Path::new("/x/Book.PDF")).await.success);
        assert!(!fs.import_ebook(Path::new("/x/noext")).await.success);
    }

    #[tokio::test]
    async fn test_import_missing_local_file_fails_softly() {
        let dir = tempdir().unwrap();
        let fs = FileSystem::new(Arc::new(LocalBackend));
        let result = fs.import_ebook(&dir.path().join("ghost.epub")).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[tokio::test]
    async fn test_copy_is_read_then_write() {
        let (fs, backend) = mock_fs();
        fs.copy_file(Path::new("/a.txt"), Path::new("/b.txt")).await.unwrap();
        assert_eq!(backend.operations(), vec!["read /a.txt", "write /b.txt"]);
        assert_eq!(fs.read_file(Path::new("/b.txt")).await.unwrap(), MOCK_FILE_CONTENTS);
    }

    #[tokio::test]
    async fn test_move_is_copy_then_delete() {
        let (fs, backend) = mock_fs();
        fs.write_file(Path::new("/a.txt"), b"note").await.unwrap();
        fs.move_file(Path::new("/a.txt"), Path::new("/b.txt")).await.unwrap();

        assert_eq!(
            backend.operations(),
            vec!["write /a.txt", "read /a.txt", "write /b.txt", "delete /a.txt"]
        );
        assert!(!fs.exists(Path::new("/a.txt")).await);
        assert_eq!(fs.read_file(Path::new("/b.txt")).await.unwrap(), b"note");
    }

    #[tokio::test]
    async fn test_move_on_local_disk() {
        let dir = tempdir().unwrap();
        let fs = FileSystem::new(Arc::new(LocalBackend));
        let from = dir.path().join("from.md");
        let to = dir.path().join("sub").join("to.md");

        fs.write_file(&from, b"# Notes").await.unwrap();
        fs.move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"# Notes");
    }

    #[tokio::test]
    async fn test_directory_operations() {
        let (fs, _) = mock_fs();
        fs.create_directory(Path::new("/library")).await.unwrap();
        fs.write_file(Path::new("/library/a.epub"), b"x").await.unwrap();

        let entries = fs.read_directory(Path::new("/library")).await.unwrap();
        assert_eq!(entries.len(), 1);

        fs.delete_directory(Path::new("/library")).await.unwrap();
        assert!(!fs.exists(Path::new("/library")).await);
    }

    #[test]
    fn test_watch_and_unwatch() {
        let (fs, _) = mock_fs();
        let id = fs.watch_file(Path::new("/notes/today.md"));
        assert_eq!(fs.watched_files(), vec![PathBuf::from("/notes/today.md")]);

        assert!(fs.unwatch_file(&id));
        assert!(!fs.unwatch_file(&id));
        assert!(fs.watched_files().is_empty());
    }

    #[tokio::test]
    async fn test_export_csv() {
        let (fs, _) = mock_fs();
        let path = Path::new("/out/highlights.csv");

        let empty = fs.export_data(&json!([]), path, "csv").await.unwrap();
        assert_eq!(empty, "");

        let data = json!([{"book": "Dune", "text": "Fear is the mind-killer"}]);
        let csv = fs.export_data(&data, path, "csv").await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "book,text");
        assert_eq!(fs.read_file(path).await.unwrap(), csv.as_bytes());
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let (fs, backend) = mock_fs();
        let result = fs.export_data(&json!([]), Path::new("/out.xml"), "xml").await;
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
        assert!(backend.operations().is_empty());
    }
}
