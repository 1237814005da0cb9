//! Command implementations

pub mod config;
pub mod export;
pub mod import;
pub mod monitor;
pub mod snapshot;

use anyhow::{Context, Result};
use mindvault_core::PerformanceConfig;
use std::path::Path;
use tracing::info;

/// Resolve the effective configuration from `--config` or the search path
pub fn load_config(explicit: Option<&Path>) -> Result<PerformanceConfig> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let (config, source) = PerformanceConfig::resolve(explicit, &cwd)?;
    match source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file found, using defaults"),
    }
    Ok(config)
}
