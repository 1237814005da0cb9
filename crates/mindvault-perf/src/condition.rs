//! Condition evaluation and threshold checks
//!
//! Violations are observability signals: they are logged and returned to the
//! caller, never raised as errors.

use mindvault_core::{
    Condition, Metric, MetricType, Operator, PerformanceConfig, PerformanceThreshold, ResourceState,
};
use std::collections::HashMap;
use tracing::warn;

/// Compare `value` against `threshold` with the named operator.
///
/// Unknown operators evaluate to `false`.
pub fn evaluate_condition(value: f64, operator: &str, threshold: f64) -> bool {
    match Operator::parse(operator) {
        Some(op) => op.apply(value, threshold),
        None => false,
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Resolve a condition metric name against the current resource snapshots.
///
/// Names are matched case-insensitively with `_` and `-` ignored, so
/// `memoryUsage` and `memory_usage` are the same metric.
pub fn metric_value(state: &ResourceState, metric: &str) -> Option<f64> {
    let key: String = metric
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    let value = match key.as_str() {
        "memoryusage" | "usedmemory" => state.memory.used_memory as f64,
        "memorypercent" => state.memory.usage_percent(),
        "availablememory" => state.memory.available_memory as f64,
        "cpuusage" => f64::from(state.hardware.cpu_usage),
        "gpuusage" => f64::from(state.hardware.gpu_usage),
        "hardwareacceleration" => flag(state.hardware.hardware_acceleration),
        "batterylevel" => f64::from(state.battery.level),
        "batterydrain" | "drainrate" => f64::from(state.battery.drain_rate),
        "charging" => flag(state.battery.charging),
        "downlink" => state.network.downlink_mbps,
        "rtt" => state.network.rtt_ms,
        "online" => flag(state.network.status.is_online()),
        _ => return None,
    };
    Some(value)
}

/// True when the condition holds for the given state; unknown metrics fail closed
pub fn condition_holds(condition: &Condition, state: &ResourceState) -> bool {
    metric_value(state, &condition.metric)
        .map(|value| evaluate_condition(value, &condition.operator, condition.value))
        .unwrap_or(false)
}

/// A threshold or resource limit that was exceeded
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// A recorded operation took longer than its type allows
    SlowOperation {
        metric_id: String,
        metric_type: MetricType,
        duration_ms: f64,
        max_duration: f64,
    },
    /// Memory in use while recording exceeded the type's limit
    MetricMemory {
        metric_id: String,
        metric_type: MetricType,
        memory_usage: u64,
        max_memory_usage: u64,
    },
    MemoryLimit { used: u64, limit: u64 },
    CpuLimit { usage: f32, limit: f32 },
    BatteryDrain { rate: f32, limit: f32 },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::SlowOperation {
                metric_id,
                metric_type,
                duration_ms,
                max_duration,
            } => write!(
                f,
                "{} took {:.1}ms (limit {:.1}ms, metric {})",
                metric_type, duration_ms, max_duration, metric_id
            ),
            Violation::MetricMemory {
                metric_id,
                metric_type,
                memory_usage,
                max_memory_usage,
            } => write!(
                f,
                "{} used {} bytes (limit {} bytes, metric {})",
                metric_type, memory_usage, max_memory_usage, metric_id
            ),
            Violation::MemoryLimit { used, limit } => {
                write!(f, "memory usage {} bytes exceeds {} bytes", used, limit)
            }
            Violation::CpuLimit { usage, limit } => {
                write!(f, "cpu usage {:.1}% exceeds {:.1}%", usage, limit)
            }
            Violation::BatteryDrain { rate, limit } => {
                write!(f, "battery drain {:.1}%/h exceeds {:.1}%/h", rate, limit)
            }
        }
    }
}

/// Check recent metrics against their type's thresholds.
///
/// Metric types without a configured threshold are skipped.
pub fn check_thresholds(
    recent: &[Metric],
    thresholds: &HashMap<MetricType, PerformanceThreshold>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for metric in recent {
        let Some(limit) = thresholds.get(&metric.metric_type) else {
            continue;
        };

        if metric.duration_ms > limit.max_duration {
            violations.push(Violation::SlowOperation {
                metric_id: metric.id.clone(),
                metric_type: metric.metric_type,
                duration_ms: metric.duration_ms,
                max_duration: limit.max_duration,
            });
        }

        if metric.memory_usage > limit.max_memory_usage {
            violations.push(Violation::MetricMemory {
                metric_id: metric.id.clone(),
                metric_type: metric.metric_type,
                memory_usage: metric.memory_usage,
                max_memory_usage: limit.max_memory_usage,
            });
        }
    }

    for violation in &violations {
        warn!("Performance threshold exceeded: {}", violation);
    }
    violations
}

/// Check the live resource snapshots against the configured ceilings
pub fn check_resource_limits(state: &ResourceState, config: &PerformanceConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    if state.memory.used_memory > config.max_memory_usage {
        violations.push(Violation::MemoryLimit {
            used: state.memory.used_memory,
            limit: config.max_memory_usage,
        });
    }

    if state.hardware.cpu_usage > config.max_cpu_usage {
        violations.push(Violation::CpuLimit {
            usage: state.hardware.cpu_usage,
            limit: config.max_cpu_usage,
        });
    }

    if !state.battery.charging && state.battery.drain_rate > config.max_battery_drain {
        violations.push(Violation::BatteryDrain {
            rate: state.battery.drain_rate,
            limit: config.max_battery_drain,
        });
    }

    for violation in &violations {
        warn!("Resource limit exceeded: {}", violation);
    }
    violations
}
