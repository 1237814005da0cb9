//! Constants and default values for Mind Vault

use std::path::PathBuf;

/// Default Mind Vault home directory name
pub const MINDVAULT_DIR: &str = ".mindvault";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    // TOML formats
    "mindvault.config.toml",
    "mindvault.toml",
    // YAML formats
    "mindvault.config.yaml",
    "mindvault.config.yml",
    "mindvault.yaml",
    "mindvault.yml",
    // JSON formats
    "mindvault.config.json",
    "mindvault.json",
];

/// Ebook file extensions accepted by import (lowercase, without dot)
pub const SUPPORTED_EBOOK_EXTENSIONS: &[&str] = &["epub", "mobi", "pdf", "txt", "md"];

/// Default polling interval for the performance monitor in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default number of most recent metrics inspected by the threshold check
pub const DEFAULT_THRESHOLD_WINDOW: usize = 10;

/// Default limit for metric queries
pub const DEFAULT_METRICS_LIMIT: usize = 100;

/// Default memory ceiling in bytes (512MB)
pub const DEFAULT_MAX_MEMORY_USAGE: u64 = 512 * 1024 * 1024;

/// Default CPU ceiling in percent
pub const DEFAULT_MAX_CPU_USAGE: f32 = 80.0;

/// Default battery drain ceiling in percent per hour
pub const DEFAULT_MAX_BATTERY_DRAIN: f32 = 10.0;

/// Max history entries kept per window
pub const MAX_WINDOW_HISTORY: usize = 100;

/// Closed windows whose history is still kept; older ones are forgotten
pub const MAX_CLOSED_WINDOW_HISTORIES: usize = 32;

/// Battery level (percent) at or below which power saving kicks in
pub const LOW_BATTERY_LEVEL: f32 = 20.0;

/// Battery level (percent) at or below which the device is considered critical
pub const CRITICAL_BATTERY_LEVEL: f32 = 5.0;

/// Get the Mind Vault home directory
pub fn mindvault_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(MINDVAULT_DIR))
        .unwrap_or_else(|| PathBuf::from(MINDVAULT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mindvault_home() {
        let home = mindvault_home();
        assert!(home.to_string_lossy().contains(".mindvault"));
    }

    #[test]
    fn test_supported_extensions_are_lowercase() {
        for ext in SUPPORTED_EBOOK_EXTENSIONS {
            assert_eq!(*ext, ext.to_lowercase());
        }
    }
}
