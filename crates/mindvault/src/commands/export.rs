//! Export command implementation

use anyhow::{Context, Result};
use mindvault_desktop::{FileSystem, LocalBackend};
use std::path::Path;
use std::sync::Arc;

use crate::output::print_result;

/// Read JSON records from `input` and write them to `output` in `format`
pub async fn execute(input: &Path, output: &Path, format: &str) -> Result<()> {
    let fs = FileSystem::new(Arc::new(LocalBackend));

    let raw = fs
        .read_file(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let data: serde_json::Value = serde_json::from_slice(&raw)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;

    let content = fs.export_data(&data, output, format).await?;

    print_result(
        true,
        &format!("Exported {} bytes to {}", content.len(), output.display()),
        Some(serde_json::json!({
            "path": output,
            "format": format,
            "bytes": content.len(),
        })),
    );
    Ok(())
}
