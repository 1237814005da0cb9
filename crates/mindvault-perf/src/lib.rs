//! Mind Vault Performance - metric collection and optimization strategies
//!
//! A [`PerformanceMonitor`] owns the metric store, the resource managers and
//! the strategy engine. A polling task refreshes the resource snapshots,
//! checks thresholds and fires every eligible strategy on each tick.

pub mod actions;
pub mod condition;
pub mod metrics;
pub mod monitor;
pub mod resources;
pub mod strategy;

pub use actions::{ActionHandler, OptimizationState, ResourceActionHandler};
pub use condition::{evaluate_condition, metric_value, Violation};
pub use metrics::{MetricStore, PerformanceStats};
pub use monitor::{MonitorBuilder, PerformanceMonitor, TickReport};
pub use resources::{
    set_shared_hardware_acceleration, AccelerationHook, BatteryReading, HardwareReading,
    MemoryReading, NetworkReading, ResourceManagers, ResourceSampler, StaticSampler, SystemSampler,
};
pub use strategy::StrategyEngine;
