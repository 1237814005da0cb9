//! Performance monitor - owns all monitoring state and the polling task

use mindvault_core::{
    BatterySnapshot, Error, HardwareSnapshot, MemorySnapshot, Metric, MetricType,
    NetworkSnapshot, OptimizationStrategy, PerformanceConfig, Platform, ResourceState, Result,
    StrategyType, DEFAULT_METRICS_LIMIT,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{ActionHandler, OptimizationState, ResourceActionHandler};
use crate::condition::{check_resource_limits, check_thresholds, Violation};
use crate::metrics::{MetricStore, PerformanceStats};
use crate::resources::{
    set_shared_hardware_acceleration, AccelerationHook, ResourceManagers, ResourceSampler,
    SystemSampler,
};
use crate::strategy::{dispatch, StrategyEngine};

/// What a single poll tick observed and did
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub violations: Vec<Violation>,
    /// Ids of the strategies that fired, in dispatch order
    pub fired: Vec<String>,
}

/// Builder for [`PerformanceMonitor`]
pub struct MonitorBuilder {
    config: PerformanceConfig,
    sampler: Option<Box<dyn ResourceSampler>>,
    platform: Platform,
    handler: Option<Arc<dyn ActionHandler>>,
}

impl MonitorBuilder {
    pub fn sampler(mut self, sampler: impl ResourceSampler + 'static) -> Self {
        self.sampler = Some(Box::new(sampler));
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Replace the default handler that applies actions to the monitor state
    pub fn handler(mut self, handler: Arc<dyn ActionHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn build(self) -> PerformanceMonitor {
        let mut sampler = self.sampler.unwrap_or_else(|| Box::new(SystemSampler::new()));

        let mut managers = ResourceManagers::new(self.config.enable_hardware_acceleration);
        managers.refresh(&mut *sampler);

        let resources = Arc::new(RwLock::new(managers));
        let optimizations = Arc::new(RwLock::new(OptimizationState::default()));
        let handler = self.handler.unwrap_or_else(|| {
            Arc::new(ResourceActionHandler::new(
                Arc::clone(&resources),
                Arc::clone(&optimizations),
            ))
        });
        let strategies = StrategyEngine::new(self.config.optimization_strategies.clone());

        PerformanceMonitor {
            inner: Arc::new(MonitorInner {
                config: self.config,
                platform: self.platform,
                metrics: RwLock::new(MetricStore::new()),
                resources,
                strategies: RwLock::new(strategies),
                optimizations,
                sampler: Mutex::new(sampler),
                handler,
                ticks: AtomicU64::new(0),
            }),
            cancel: Mutex::new(None),
        }
    }
}

struct MonitorInner {
    config: PerformanceConfig,
    platform: Platform,
    metrics: RwLock<MetricStore>,
    resources: Arc<RwLock<ResourceManagers>>,
    strategies: RwLock<StrategyEngine>,
    optimizations: Arc<RwLock<OptimizationState>>,
    sampler: Mutex<Box<dyn ResourceSampler>>,
    handler: Arc<dyn ActionHandler>,
    ticks: AtomicU64,
}

impl MonitorInner {
    fn type_allowed(&self, strategy_type: StrategyType) -> bool {
        match strategy_type {
            StrategyType::Memory => self.config.enable_memory_optimization,
            StrategyType::Battery => self.config.enable_battery_optimization,
            StrategyType::Hardware => self.config.enable_hardware_acceleration,
            _ => true,
        }
    }

    fn check_recent_thresholds(&self) -> Vec<Violation> {
        let recent = self
            .metrics
            .read()
            .get_metrics(None, self.config.threshold_window);
        check_thresholds(&recent, &self.config.performance_thresholds)
    }

    fn poll_interval(&self) -> Duration {
        let ms = self
            .optimizations
            .read()
            .polling_interval_ms
            .unwrap_or(self.config.poll_interval_ms);
        Duration::from_millis(ms.max(1))
    }

    fn tick(&self) -> TickReport {
        {
            let mut sampler = self.sampler.lock();
            self.resources.write().refresh(&mut **sampler);
        }
        let state = self.resources.read().state();

        let mut violations = self.check_recent_thresholds();
        violations.extend(check_resource_limits(&state, &self.config));

        let eligible = self
            .strategies
            .read()
            .select(self.platform, &state, |t| self.type_allowed(t));
        for strategy in &eligible {
            dispatch(strategy, &self.handler);
        }

        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        if !eligible.is_empty() {
            debug!("Tick {}: fired {} strategies", tick, eligible.len());
        }

        TickReport {
            violations,
            fired: eligible.into_iter().map(|s| s.id).collect(),
        }
    }
}

/// Metric store, resource managers and strategy engine of one process
pub struct PerformanceMonitor {
    inner: Arc<MonitorInner>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl PerformanceMonitor {
    /// Monitor reading the operating system through sysinfo
    pub fn new(config: PerformanceConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: PerformanceConfig) -> MonitorBuilder {
        MonitorBuilder {
            config,
            sampler: None,
            platform: Platform::current(),
            handler: None,
        }
    }

    pub fn config(&self) -> &PerformanceConfig {
        &self.inner.config
    }

    pub fn platform(&self) -> Platform {
        self.inner.platform
    }

    /// Record a metric with the current resource snapshot and run the
    /// threshold check. Returns `None` when metrics are disabled.
    pub fn record_metric(
        &self,
        metric_type: MetricType,
        duration_ms: f64,
        context: Option<HashMap<String, serde_json::Value>>,
    ) -> Option<String> {
        self.record_metric_checked(metric_type, duration_ms, context)
            .map(|(id, _)| id)
    }

    /// Like [`record_metric`](Self::record_metric), also returning the
    /// violations found by the threshold check that follows the insert
    pub fn record_metric_checked(
        &self,
        metric_type: MetricType,
        duration_ms: f64,
        context: Option<HashMap<String, serde_json::Value>>,
    ) -> Option<(String, Vec<Violation>)> {
        if !self.inner.config.enable_metrics {
            debug!("Metrics disabled, dropping {} sample", metric_type);
            return None;
        }

        let state = self.inner.resources.read().state();
        let id = self
            .inner
            .metrics
            .write()
            .record(metric_type, duration_ms, context, &state);
        let violations = self.inner.check_recent_thresholds();
        Some((id, violations))
    }

    /// Most recent metrics first; `limit` defaults to 100
    pub fn get_metrics(
        &self,
        metric_type: Option<MetricType>,
        limit: Option<usize>,
    ) -> Vec<Metric> {
        self.inner
            .metrics
            .read()
            .get_metrics(metric_type, limit.unwrap_or(DEFAULT_METRICS_LIMIT))
    }

    pub fn get_performance_stats(&self, metric_type: Option<MetricType>) -> PerformanceStats {
        self.inner.metrics.read().stats(metric_type)
    }

    /// Remove metrics older than the given number of hours; `0` clears all
    pub fn clear_old_metrics(&self, older_than_hours: u64) -> usize {
        let removed = self.inner.metrics.write().clear_old(older_than_hours);
        debug!("Cleared {} metrics older than {}h", removed, older_than_hours);
        removed
    }

    /// Run the threshold check over the most recent metrics
    pub fn check_thresholds(&self) -> Vec<Violation> {
        self.inner.check_recent_thresholds()
    }

    pub fn hardware(&self) -> HardwareSnapshot {
        self.inner.resources.read().hardware.snapshot()
    }

    pub fn memory(&self) -> MemorySnapshot {
        self.inner.resources.read().memory.snapshot()
    }

    pub fn battery(&self) -> BatterySnapshot {
        self.inner.resources.read().battery.snapshot()
    }

    pub fn network(&self) -> NetworkSnapshot {
        self.inner.resources.read().network.snapshot()
    }

    pub fn resources(&self) -> ResourceState {
        self.inner.resources.read().state()
    }

    /// Store the flag, then notify the acceleration hook with no lock held
    pub fn set_hardware_acceleration(&self, enabled: bool) {
        set_shared_hardware_acceleration(&self.inner.resources, enabled);
    }

    pub fn set_acceleration_hook(&self, hook: AccelerationHook) {
        self.inner.resources.write().hardware.set_acceleration_hook(hook);
    }

    pub fn add_optimization_strategy(&self, strategy: OptimizationStrategy) {
        let id = strategy.id.clone();
        if self.inner.strategies.write().add(strategy) {
            debug!("Replaced optimization strategy {}", id);
        } else {
            debug!("Added optimization strategy {}", id);
        }
    }

    pub fn remove_optimization_strategy(&self, id: &str) -> bool {
        self.inner.strategies.write().remove(id)
    }

    /// Enable or disable a strategy without removing it
    pub fn set_strategy_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        if self.inner.strategies.write().set_enabled(id, enabled) {
            Ok(())
        } else {
            Err(Error::StrategyNotFound(id.to_string()))
        }
    }

    pub fn strategies(&self) -> Vec<OptimizationStrategy> {
        self.inner.strategies.read().strategies().to_vec()
    }

    pub fn optimizations(&self) -> OptimizationState {
        self.inner.optimizations.read().clone()
    }

    /// Run one poll tick: refresh resources, check thresholds and limits,
    /// fire eligible strategies
    pub fn tick(&self) -> TickReport {
        self.inner.tick()
    }

    pub fn tick_count(&self) -> u64 {
        self.inner.ticks.load(Ordering::SeqCst)
    }

    /// Current delay between ticks, including any throttling in effect
    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval()
    }

    /// Spawn the polling task on the current tokio runtime.
    /// Returns false if monitoring is already running or no runtime exists.
    pub fn start_monitoring(&self) -> bool {
        let mut cancel = self.cancel.lock();
        if cancel.is_some() {
            return false;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, performance monitoring not started");
            return false;
        };

        let token = CancellationToken::new();
        let stopped = token.clone();
        let inner = Arc::clone(&self.inner);

        runtime.spawn(async move {
            info!("Performance monitoring started");
            loop {
                let interval = inner.poll_interval();
                tokio::select! {
                    _ = stopped.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        inner.tick();
                    }
                }
            }
            info!("Performance monitoring stopped");
        });

        *cancel = Some(token);
        true
    }

    /// Cancel future ticks. Delayed actions already scheduled still run.
    /// Returns false if monitoring was not running.
    pub fn stop_monitoring(&self) -> bool {
        match self.cancel.lock().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl Drop for PerformanceMonitor {
    fn drop(&mut self) {
        if let Some(token) = self.cancel.get_mut().take() {
            token.cancel();
        }
    }
}
