//! Configuration file parsing for Mind Vault
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)
//!
//! A config file is a partial override: every field is optional and falls
//! back to the defaults in [`PerformanceConfig::default`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{
    ActionKind, Condition, MetricType, OptimizationStrategy, PerformanceThreshold,
    StrategyAction, StrategyType,
};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Effective performance monitor configuration
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceConfig {
    pub enable_metrics: bool,
    pub enable_hardware_acceleration: bool,
    pub enable_memory_optimization: bool,
    pub enable_battery_optimization: bool,
    /// Memory ceiling in bytes
    pub max_memory_usage: u64,
    /// CPU ceiling in percent
    pub max_cpu_usage: f32,
    /// Battery drain ceiling in percent per hour
    pub max_battery_drain: f32,
    pub performance_thresholds: HashMap<MetricType, PerformanceThreshold>,
    pub optimization_strategies: Vec<OptimizationStrategy>,
    pub poll_interval_ms: u64,
    /// Number of most recent metrics inspected by the threshold check
    pub threshold_window: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            enable_hardware_acceleration: true,
            enable_memory_optimization: true,
            enable_battery_optimization: true,
            max_memory_usage: DEFAULT_MAX_MEMORY_USAGE,
            max_cpu_usage: DEFAULT_MAX_CPU_USAGE,
            max_battery_drain: DEFAULT_MAX_BATTERY_DRAIN,
            performance_thresholds: default_thresholds(),
            optimization_strategies: default_strategies(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            threshold_window: DEFAULT_THRESHOLD_WINDOW,
        }
    }
}

fn threshold(max_duration: f64, max_memory_mb: u64) -> PerformanceThreshold {
    PerformanceThreshold {
        max_duration,
        max_memory_usage: max_memory_mb * 1024 * 1024,
    }
}

/// Built-in per metric type limits
pub fn default_thresholds() -> HashMap<MetricType, PerformanceThreshold> {
    HashMap::from([
        (MetricType::PageLoad, threshold(3000.0, 100)),
        (MetricType::ComponentRender, threshold(16.0, 50)),
        (MetricType::DataFetch, threshold(5000.0, 50)),
        (MetricType::FileOperation, threshold(1000.0, 100)),
        (MetricType::Search, threshold(500.0, 50)),
        (MetricType::Sync, threshold(10000.0, 100)),
        (MetricType::UserInteraction, threshold(100.0, 50)),
    ])
}

/// Built-in strategies shipped with the monitor
pub fn default_strategies() -> Vec<OptimizationStrategy> {
    vec![
        OptimizationStrategy::new(
            "high-memory",
            "Free memory under pressure",
            StrategyType::Memory,
        )
        .with_condition(Condition::new("memoryPercent", "gt", 85.0))
        .with_action(StrategyAction::immediate(ActionKind::ClearCache))
        .with_priority(1),
        OptimizationStrategy::new(
            "high-cpu",
            "Lower render cost under CPU load",
            StrategyType::Cpu,
        )
        .with_condition(Condition::new("cpuUsage", "gt", f64::from(DEFAULT_MAX_CPU_USAGE)))
        .with_action(StrategyAction::immediate(ActionKind::ReduceAnimations))
        .with_action(StrategyAction::delayed(ActionKind::ReduceQuality { level: 75 }, 500))
        .with_priority(2),
        // same boundary as the mobile power policy: saver mode starts at 20%
        OptimizationStrategy::new(
            "low-battery",
            "Save power on low battery",
            StrategyType::Battery,
        )
        .with_condition(Condition::new("batteryLevel", "lte", f64::from(LOW_BATTERY_LEVEL)))
        .with_condition(Condition::new("charging", "eq", 0.0))
        .with_action(StrategyAction::immediate(ActionKind::ReduceAnimations))
        .with_action(StrategyAction::immediate(ActionKind::ThrottlePolling {
            interval_ms: 5000,
        }))
        .with_action(StrategyAction::immediate(ActionKind::PauseBackgroundTasks))
        .with_priority(0),
    ]
}

/// Configuration file structure (mindvault.config.toml/yaml/json)
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub enable_metrics: Option<bool>,
    pub enable_hardware_acceleration: Option<bool>,
    pub enable_memory_optimization: Option<bool>,
    pub enable_battery_optimization: Option<bool>,
    pub max_memory_usage: Option<u64>,
    pub max_cpu_usage: Option<f32>,
    pub max_battery_drain: Option<f32>,
    /// Keyed by metric type name; merged over the built-in thresholds
    #[serde(default)]
    pub performance_thresholds: HashMap<String, PerformanceThreshold>,
    /// Replaces the built-in strategy list when present
    pub optimization_strategies: Option<Vec<OptimizationStrategy>>,
    pub poll_interval_ms: Option<u64>,
    pub threshold_window: Option<usize>,
}

impl ConfigFile {
    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Json => Ok(serde_json::from_str(content)?),
        }
    }

    /// Find and load a config file from the given directory
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }
        Err(Error::ConfigError(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }

    /// Merge this partial config over the defaults
    pub fn into_config(self) -> Result<PerformanceConfig> {
        self.apply_to(PerformanceConfig::default())
    }

    /// Merge this partial config over an existing config
    pub fn apply_to(self, mut base: PerformanceConfig) -> Result<PerformanceConfig> {
        if let Some(v) = self.enable_metrics {
            base.enable_metrics = v;
        }
        if let Some(v) = self.enable_hardware_acceleration {
            base.enable_hardware_acceleration = v;
        }
        if let Some(v) = self.enable_memory_optimization {
            base.enable_memory_optimization = v;
        }
        if let Some(v) = self.enable_battery_optimization {
            base.enable_battery_optimization = v;
        }
        if let Some(v) = self.max_memory_usage {
            base.max_memory_usage = v;
        }
        if let Some(v) = self.max_cpu_usage {
            base.max_cpu_usage = v;
        }
        if let Some(v) = self.max_battery_drain {
            base.max_battery_drain = v;
        }
        for (name, limit) in self.performance_thresholds {
            let metric_type: MetricType = name.parse()?;
            base.performance_thresholds.insert(metric_type, limit);
        }
        if let Some(strategies) = self.optimization_strategies {
            base.optimization_strategies = strategies;
        }
        if let Some(v) = self.poll_interval_ms {
            if v == 0 {
                return Err(Error::config("poll_interval_ms must be greater than zero"));
            }
            base.poll_interval_ms = v;
        }
        if let Some(v) = self.threshold_window {
            base.threshold_window = v;
        }
        Ok(base)
    }
}

impl PerformanceConfig {
    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Otherwise the working directory and then
    /// the Mind Vault home directory are searched; with no file found the
    /// defaults are used.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = ConfigFile::load(path)?.into_config()?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for dir in [cwd.to_path_buf(), mindvault_home()] {
            if CONFIG_FILES.iter().any(|name| dir.join(name).exists()) {
                let (file, path) = ConfigFile::find_and_load(&dir)?;
                return Ok((file.into_config()?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }
}
