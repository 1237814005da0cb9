//! Core types for Mind Vault

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use crate::error::{Error, Result};

fn default_enabled() -> bool {
    true
}

/// Kind of operation a performance metric was recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    PageLoad,
    ComponentRender,
    DataFetch,
    FileOperation,
    Search,
    Sync,
    UserInteraction,
    Custom,
}

impl MetricType {
    pub const ALL: [MetricType; 8] = [
        MetricType::PageLoad,
        MetricType::ComponentRender,
        MetricType::DataFetch,
        MetricType::FileOperation,
        MetricType::Search,
        MetricType::Sync,
        MetricType::UserInteraction,
        MetricType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::PageLoad => "page_load",
            MetricType::ComponentRender => "component_render",
            MetricType::DataFetch => "data_fetch",
            MetricType::FileOperation => "file_operation",
            MetricType::Search => "search",
            MetricType::Sync => "sync",
            MetricType::UserInteraction => "user_interaction",
            MetricType::Custom => "custom",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_lowercase().replace('-', "_");
        MetricType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized || t.as_str().replace('_', "") == normalized)
            .ok_or_else(|| Error::config(format!("Unknown metric type: {}", s)))
    }
}

/// Connectivity as seen by the network manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    #[default]
    Online,
    Offline,
    Slow,
}

impl NetworkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkStatus::Online => "online",
            NetworkStatus::Offline => "offline",
            NetworkStatus::Slow => "slow",
        }
    }

    pub fn is_online(&self) -> bool {
        !matches!(self, NetworkStatus::Offline)
    }
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Wifi,
    Ethernet,
    Cellular,
    #[default]
    Unknown,
}

/// One observed performance event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub metric_type: MetricType,
    pub timestamp: DateTime<Utc>,
    /// Duration of the measured operation in milliseconds
    pub duration_ms: f64,
    /// Used memory in bytes at recording time
    pub memory_usage: u64,
    pub cpu_usage: f32,
    pub gpu_usage: f32,
    pub battery_level: f32,
    pub network_status: NetworkStatus,
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

/// Hardware dimension snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HardwareSnapshot {
    pub cpu_cores: usize,
    /// Global CPU usage in percent
    pub cpu_usage: f32,
    /// GPU usage in percent (0 when unknown)
    pub gpu_usage: f32,
    pub gpu_available: bool,
    pub hardware_acceleration: bool,
}

impl Default for HardwareSnapshot {
    fn default() -> Self {
        Self {
            cpu_cores: 1,
            cpu_usage: 0.0,
            gpu_usage: 0.0,
            gpu_available: false,
            hardware_acceleration: false,
        }
    }
}

/// Memory dimension snapshot, in bytes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemorySnapshot {
    pub used_memory: u64,
    pub total_memory: u64,
    pub available_memory: u64,
}

impl MemorySnapshot {
    /// Used memory as a percentage of total (0 when total is unknown)
    pub fn usage_percent(&self) -> f64 {
        if self.total_memory == 0 {
            return 0.0;
        }
        self.used_memory as f64 / self.total_memory as f64 * 100.0
    }
}

/// Battery dimension snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatterySnapshot {
    /// Charge level in percent
    pub level: f32,
    pub charging: bool,
    /// Observed drain in percent per hour (0 while charging or unknown)
    pub drain_rate: f32,
}

impl Default for BatterySnapshot {
    fn default() -> Self {
        Self {
            level: 100.0,
            charging: false,
            drain_rate: 0.0,
        }
    }
}

/// Network dimension snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSnapshot {
    pub status: NetworkStatus,
    pub connection_type: ConnectionType,
    /// Estimated downlink in Mbit/s
    pub downlink_mbps: f64,
    /// Round-trip time in milliseconds
    pub rtt_ms: f64,
}

impl Default for NetworkSnapshot {
    fn default() -> Self {
        Self {
            status: NetworkStatus::Online,
            connection_type: ConnectionType::Unknown,
            downlink_mbps: 10.0,
            rtt_ms: 0.0,
        }
    }
}

/// All resource dimensions at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceState {
    pub hardware: HardwareSnapshot,
    pub memory: MemorySnapshot,
    pub battery: BatterySnapshot,
    pub network: NetworkSnapshot,
}

/// Platform a strategy applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Desktop,
    Mobile,
    Tablet,
    Web,
}

impl Platform {
    /// Platform of the running binary
    pub fn current() -> Self {
        if cfg!(any(target_os = "android", target_os = "ios")) {
            Platform::Mobile
        } else if cfg!(target_family = "wasm") {
            Platform::Web
        } else {
            Platform::Desktop
        }
    }
}

/// Resource dimension a strategy targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Memory,
    Cpu,
    Battery,
    Network,
    Hardware,
    Rendering,
}

/// Comparison operators understood by conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
}

impl Operator {
    /// Parse an operator name; returns None for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gt" | ">" => Some(Operator::Gt),
            "lt" | "<" => Some(Operator::Lt),
            "eq" | "==" | "=" => Some(Operator::Eq),
            "gte" | ">=" => Some(Operator::Gte),
            "lte" | "<=" => Some(Operator::Lte),
            _ => None,
        }
    }

    pub fn apply(&self, value: f64, threshold: f64) -> bool {
        match self {
            Operator::Gt => value > threshold,
            Operator::Lt => value < threshold,
            Operator::Eq => (value - threshold).abs() < f64::EPSILON,
            Operator::Gte => value >= threshold,
            Operator::Lte => value <= threshold,
        }
    }
}

/// Trigger condition of a strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    /// Resource metric name, e.g. "memoryUsage" or "battery_level"
    pub metric: String,
    /// Operator name (gt, lt, eq, gte, lte)
    pub operator: String,
    pub value: f64,
}

impl Condition {
    pub fn new(metric: impl Into<String>, operator: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            operator: operator.into(),
            value,
        }
    }
}

/// Remedial action a strategy can dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionKind {
    ClearCache,
    ReduceAnimations,
    RestoreAnimations,
    /// Lower render quality to the given percentage
    ReduceQuality { level: u8 },
    RestoreQuality,
    EnableHardwareAcceleration,
    DisableHardwareAcceleration,
    /// Slow down background polling to the given interval
    ThrottlePolling { interval_ms: u64 },
    PauseBackgroundTasks,
    ResumeBackgroundTasks,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ClearCache => "clear_cache",
            ActionKind::ReduceAnimations => "reduce_animations",
            ActionKind::RestoreAnimations => "restore_animations",
            ActionKind::ReduceQuality { .. } => "reduce_quality",
            ActionKind::RestoreQuality => "restore_quality",
            ActionKind::EnableHardwareAcceleration => "enable_hardware_acceleration",
            ActionKind::DisableHardwareAcceleration => "disable_hardware_acceleration",
            ActionKind::ThrottlePolling { .. } => "throttle_polling",
            ActionKind::PauseBackgroundTasks => "pause_background_tasks",
            ActionKind::ResumeBackgroundTasks => "resume_background_tasks",
        }
    }
}

/// An action plus its optional dispatch delay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAction {
    pub action: ActionKind,
    #[serde(default)]
    pub delay_ms: u64,
}

impl StrategyAction {
    pub fn immediate(action: ActionKind) -> Self {
        Self { action, delay_ms: 0 }
    }

    pub fn delayed(action: ActionKind, delay_ms: u64) -> Self {
        Self { action, delay_ms }
    }
}

/// A rule: when all conditions hold, run the actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStrategy {
    pub id: String,
    pub name: String,
    pub strategy_type: StrategyType,
    /// Platforms this strategy applies to; empty means all
    #[serde(default)]
    pub platforms: BTreeSet<Platform>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<StrategyAction>,
    /// Lower runs earlier
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl OptimizationStrategy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        strategy_type: StrategyType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            strategy_type,
            platforms: BTreeSet::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
            priority: 0,
            enabled: true,
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_action(mut self, action: StrategyAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platforms.insert(platform);
        self
    }

    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }
}

/// Per metric type limits checked after each recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThreshold {
    /// Max duration in milliseconds
    pub max_duration: f64,
    /// Max memory usage in bytes
    pub max_memory_usage: u64,
}
