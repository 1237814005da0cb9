//! Import command implementation

use anyhow::{bail, Result};
use mindvault_desktop::{FileSystem, LocalBackend};
use std::path::Path;
use std::sync::Arc;

use crate::output::print_result;

pub async fn execute(path: &Path) -> Result<()> {
    let fs = FileSystem::new(Arc::new(LocalBackend));
    let result = fs.import_ebook(path).await;

    if result.success {
        let message = format!(
            "Imported '{}' ({})",
            result.title.as_deref().unwrap_or("Untitled"),
            result.book_id.as_deref().unwrap_or("-")
        );
        print_result(true, &message, Some(&result));
        Ok(())
    } else {
        bail!(result.error.unwrap_or_else(|| "Import failed".to_string()))
    }
}
