//! In-memory metric store

use chrono::{Duration, Utc};
use mindvault_core::{Metric, MetricType, ResourceState};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate over a set of metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceStats {
    /// Mean duration in milliseconds
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
    /// Mean memory usage in bytes
    pub avg_memory: f64,
    /// Mean CPU usage in percent
    pub avg_cpu: f64,
}

/// Store of recorded metrics keyed by id
#[derive(Debug, Default)]
pub struct MetricStore {
    metrics: HashMap<String, Metric>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric, capturing the given resource state, and return its id
    pub fn record(
        &mut self,
        metric_type: MetricType,
        duration_ms: f64,
        context: Option<HashMap<String, serde_json::Value>>,
        state: &ResourceState,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let metric = Metric {
            id: id.clone(),
            metric_type,
            timestamp: Utc::now(),
            duration_ms,
            memory_usage: state.memory.used_memory,
            cpu_usage: state.hardware.cpu_usage,
            gpu_usage: state.hardware.gpu_usage,
            battery_level: state.battery.level,
            network_status: state.network.status,
            context: context.unwrap_or_default(),
        };
        self.metrics.insert(id.clone(), metric);
        id
    }

    /// Insert a fully built metric, replacing any metric with the same id
    pub fn insert(&mut self, metric: Metric) {
        self.metrics.insert(metric.id.clone(), metric);
    }

    pub fn get(&self, id: &str) -> Option<&Metric> {
        self.metrics.get(id)
    }

    /// Most recent metrics first, optionally filtered by type
    pub fn get_metrics(&self, metric_type: Option<MetricType>, limit: usize) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self
            .metrics
            .values()
            .filter(|m| metric_type.map_or(true, |t| m.metric_type == t))
            .cloned()
            .collect();
        metrics.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        metrics.truncate(limit);
        metrics
    }

    pub fn stats(&self, metric_type: Option<MetricType>) -> PerformanceStats {
        let selected: Vec<&Metric> = self
            .metrics
            .values()
            .filter(|m| metric_type.map_or(true, |t| m.metric_type == t))
            .collect();

        if selected.is_empty() {
            return PerformanceStats::default();
        }

        let count = selected.len();
        let n = count as f64;
        let total_duration: f64 = selected.iter().map(|m| m.duration_ms).sum();
        let max = selected
            .iter()
            .map(|m| m.duration_ms)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = selected
            .iter()
            .map(|m| m.duration_ms)
            .fold(f64::INFINITY, f64::min);
        let total_memory: f64 = selected.iter().map(|m| m.memory_usage as f64).sum();
        let total_cpu: f64 = selected.iter().map(|m| f64::from(m.cpu_usage)).sum();

        PerformanceStats {
            average: total_duration / n,
            max,
            min,
            count,
            avg_memory: total_memory / n,
            avg_cpu: total_cpu / n,
        }
    }

    /// Delete metrics older than the given age; `0` clears the store.
    /// Returns the number of removed metrics.
    pub fn clear_old(&mut self, older_than_hours: u64) -> usize {
        let before = self.metrics.len();
        if older_than_hours == 0 {
            self.metrics.clear();
            return before;
        }

        // an age beyond what chrono can represent reaches past every metric
        let Some(cutoff) = i64::try_from(older_than_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };
        self.metrics.retain(|_, m| m.timestamp >= cutoff);
        before - self.metrics.len()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindvault_core::NetworkStatus;

    fn metric_at(metric_type: MetricType, hours_ago: i64, duration_ms: f64) -> Metric {
        Metric {
            id: uuid::Uuid::new_v4().to_string(),
            metric_type,
            timestamp: Utc::now() - Duration::hours(hours_ago),
            duration_ms,
            memory_usage: 1000,
            cpu_usage: 10.0,
            gpu_usage: 0.0,
            battery_level: 100.0,
            network_status: NetworkStatus::Online,
            context: HashMap::new(),
        }
    }

    #[test]
    fn test_record_captures_snapshot() {
        let mut store = MetricStore::new();
        let mut state = ResourceState::default();
        state.memory.used_memory = 4096;
        state.hardware.cpu_usage = 42.0;
        state.battery.level = 55.0;

        let context = HashMap::from([("page".to_string(), serde_json::json!("/library"))]);
        let id = store.record(MetricType::PageLoad, 120.0, Some(context), &state);

        let metric = store.get(&id).unwrap();
        assert_eq!(metric.memory_usage, 4096);
        assert_eq!(metric.cpu_usage, 42.0);
        assert_eq!(metric.battery_level, 55.0);
        assert_eq!(metric.context["page"], "/library");
    }

    #[test]
    fn test_record_generates_unique_ids() {
        let mut store = MetricStore::new();
        let state = ResourceState::default();
        let a = store.record(MetricType::Search, 1.0, None, &state);
        let b = store.record(MetricType::Search, 1.0, None, &state);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_metrics_filters_and_sorts_descending() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::PageLoad, 3, 1.0));
        store.insert(metric_at(MetricType::Search, 2, 2.0));
        store.insert(metric_at(MetricType::PageLoad, 1, 3.0));
        store.insert(metric_at(MetricType::PageLoad, 5, 4.0));

        let page_loads = store.get_metrics(Some(MetricType::PageLoad), 100);
        assert_eq!(page_loads.len(), 3);
        assert!(page_loads.iter().all(|m| m.metric_type == MetricType::PageLoad));
        assert!(page_loads
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(page_loads[0].duration_ms, 3.0);

        let limited = store.get_metrics(None, 2);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].duration_ms, 3.0);
        assert_eq!(limited[1].duration_ms, 2.0);
    }

    #[test]
    fn test_get_metrics_returns_copies() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::Sync, 0, 5.0));

        let mut copy = store.get_metrics(None, 10);
        copy[0].duration_ms = 999.0;
        copy.clear();

        assert_eq!(store.get_metrics(None, 10)[0].duration_ms, 5.0);
    }

    #[test]
    fn test_stats_empty_is_zero() {
        let store = MetricStore::new();
        assert_eq!(store.stats(None), PerformanceStats::default());
        assert_eq!(store.stats(Some(MetricType::PageLoad)).count, 0);
    }

    #[test]
    fn test_stats_aggregates() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::DataFetch, 0, 100.0));
        store.insert(metric_at(MetricType::DataFetch, 0, 300.0));
        store.insert(metric_at(MetricType::Search, 0, 1000.0));

        let stats = store.stats(Some(MetricType::DataFetch));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average, 200.0);
        assert_eq!(stats.max, 300.0);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.avg_memory, 1000.0);
        assert_eq!(stats.avg_cpu, 10.0);

        assert_eq!(store.stats(None).count, 3);
    }

    #[test]
    fn test_clear_old_zero_clears_everything() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::PageLoad, 0, 1.0));
        store.insert(metric_at(MetricType::PageLoad, 30, 1.0));

        assert_eq!(store.clear_old(0), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_old_keeps_recent() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::PageLoad, 1, 1.0));
        store.insert(metric_at(MetricType::PageLoad, 23, 2.0));
        store.insert(metric_at(MetricType::PageLoad, 25, 3.0));
        store.insert(metric_at(MetricType::PageLoad, 48, 4.0));

        assert_eq!(store.clear_old(24), 2);
        let remaining = store.get_metrics(None, 10);
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|m| m.duration_ms <= 2.0));
    }

    #[test]
    fn test_clear_old_huge_age_keeps_everything() {
        let mut store = MetricStore::new();
        store.insert(metric_at(MetricType::Search, 0, 1.0));
        store.insert(metric_at(MetricType::Search, 5000, 1.0));

        assert_eq!(store.clear_old(u64::MAX), 0);
        assert_eq!(store.clear_old(1u64 << 62), 0);
        assert_eq!(store.clear_old(3_000_000_000_000), 0);
        assert_eq!(store.len(), 2);
    }
}
