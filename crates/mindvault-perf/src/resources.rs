//! Resource managers and the samplers that feed them
//!
//! Each manager holds exactly one live snapshot that is overwritten on every
//! refresh. A sampler returning `None` for a dimension means the platform has no
//! instrumentation for it; the manager then falls back to safe defaults.

use mindvault_core::{
    BatterySnapshot, ConnectionType, HardwareSnapshot, MemorySnapshot, NetworkSnapshot,
    NetworkStatus, ResourceState, Result,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::System;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardwareReading {
    pub cpu_cores: usize,
    pub cpu_usage: f32,
    pub gpu_usage: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryReading {
    pub used: u64,
    pub total: u64,
    pub available: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryReading {
    pub level: f32,
    pub charging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkReading {
    pub status: NetworkStatus,
    pub connection_type: ConnectionType,
    pub downlink_mbps: f64,
    pub rtt_ms: f64,
}

/// Source of platform resource readings
pub trait ResourceSampler: Send {
    fn hardware(&mut self) -> Option<HardwareReading>;
    fn memory(&mut self) -> Option<MemoryReading>;
    fn battery(&mut self) -> Option<BatteryReading>;
    fn network(&mut self) -> Option<NetworkReading>;
}

/// Sampler backed by the operating system via sysinfo.
///
/// CPU and memory come from the OS; there is no battery, GPU or network
/// instrumentation so those dimensions use the manager defaults.
pub struct SystemSampler {
    system: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        system.refresh_memory();
        Self { system }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for SystemSampler {
    fn hardware(&mut self) -> Option<HardwareReading> {
        self.system.refresh_cpu();
        let cores = self.system.cpus().len();
        if cores == 0 {
            return None;
        }
        Some(HardwareReading {
            cpu_cores: cores,
            cpu_usage: self.system.global_cpu_info().cpu_usage(),
            gpu_usage: None,
        })
    }

    fn memory(&mut self) -> Option<MemoryReading> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return None;
        }
        Some(MemoryReading {
            used: self.system.used_memory(),
            total,
            available: self.system.available_memory(),
        })
    }

    fn battery(&mut self) -> Option<BatteryReading> {
        None
    }

    fn network(&mut self) -> Option<NetworkReading> {
        None
    }
}

#[derive(Debug, Default)]
struct StaticReadings {
    hardware: Option<HardwareReading>,
    memory: Option<MemoryReading>,
    battery: Option<BatteryReading>,
    network: Option<NetworkReading>,
}

/// Sampler returning readings set by the caller.
///
/// Clones share the same readings, so a clone kept outside the monitor can
/// change what the next refresh observes.
#[derive(Debug, Clone, Default)]
pub struct StaticSampler {
    readings: Arc<Mutex<StaticReadings>>,
}

impl StaticSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hardware(&self, reading: Option<HardwareReading>) {
        self.readings.lock().hardware = reading;
    }

    pub fn set_memory(&self, reading: Option<MemoryReading>) {
        self.readings.lock().memory = reading;
    }

    pub fn set_battery(&self, reading: Option<BatteryReading>) {
        self.readings.lock().battery = reading;
    }

    pub fn set_network(&self, reading: Option<NetworkReading>) {
        self.readings.lock().network = reading;
    }

    /// Convenience for the common case of only tracking used memory
    pub fn set_used_memory(&self, used: u64) {
        let mut readings = self.readings.lock();
        let total = readings.memory.map_or(used.max(1) * 2, |m| m.total.max(used));
        readings.memory = Some(MemoryReading {
            used,
            total,
            available: total - used,
        });
    }
}

impl ResourceSampler for StaticSampler {
    fn hardware(&mut self) -> Option<HardwareReading> {
        self.readings.lock().hardware
    }

    fn memory(&mut self) -> Option<MemoryReading> {
        self.readings.lock().memory
    }

    fn battery(&mut self) -> Option<BatteryReading> {
        self.readings.lock().battery
    }

    fn network(&mut self) -> Option<NetworkReading> {
        self.readings.lock().network
    }
}

/// Callback invoked when hardware acceleration is toggled
pub type AccelerationHook = Arc<dyn Fn(bool) -> Result<()> + Send + Sync>;

pub struct HardwareManager {
    snapshot: HardwareSnapshot,
    hook: Option<AccelerationHook>,
}

impl HardwareManager {
    pub fn new(hardware_acceleration: bool) -> Self {
        Self {
            snapshot: HardwareSnapshot {
                hardware_acceleration,
                ..Default::default()
            },
            hook: None,
        }
    }

    pub fn snapshot(&self) -> HardwareSnapshot {
        self.snapshot.clone()
    }

    pub fn refresh(&mut self, reading: Option<HardwareReading>) {
        let acceleration = self.snapshot.hardware_acceleration;
        self.snapshot = match reading {
            Some(r) => HardwareSnapshot {
                cpu_cores: r.cpu_cores,
                cpu_usage: r.cpu_usage,
                gpu_usage: r.gpu_usage.unwrap_or(0.0),
                gpu_available: r.gpu_usage.is_some(),
                hardware_acceleration: acceleration,
            },
            None => HardwareSnapshot {
                hardware_acceleration: acceleration,
                ..Default::default()
            },
        };
    }

    pub fn set_acceleration_hook(&mut self, hook: AccelerationHook) {
        self.hook = Some(hook);
    }

    /// Store the flag and notify the hook. A failing hook is logged and the
    /// flag keeps the requested value.
    pub fn set_hardware_acceleration(&mut self, enabled: bool) {
        let hook = self.store_hardware_acceleration(enabled);
        notify_acceleration_hook(hook.as_ref(), enabled);
    }

    /// Store the flag only, returning the hook the caller must notify
    pub fn store_hardware_acceleration(&mut self, enabled: bool) -> Option<AccelerationHook> {
        self.snapshot.hardware_acceleration = enabled;
        debug!("Hardware acceleration {}", if enabled { "enabled" } else { "disabled" });
        self.hook.clone()
    }
}

fn notify_acceleration_hook(hook: Option<&AccelerationHook>, enabled: bool) {
    if let Some(hook) = hook {
        if let Err(e) = hook(enabled) {
            warn!("Hardware acceleration hook failed: {}", e);
        }
    }
}

/// Toggle acceleration on shared managers. The hook runs after the write
/// lock is released, so it may read the managers itself.
pub fn set_shared_hardware_acceleration(resources: &RwLock<ResourceManagers>, enabled: bool) {
    let hook = resources.write().hardware.store_hardware_acceleration(enabled);
    notify_acceleration_hook(hook.as_ref(), enabled);
}

#[derive(Debug, Default)]
pub struct MemoryManager {
    snapshot: MemorySnapshot,
}

impl MemoryManager {
    pub fn snapshot(&self) -> MemorySnapshot {
        self.snapshot.clone()
    }

    pub fn refresh(&mut self, reading: Option<MemoryReading>) {
        self.snapshot = reading
            .map(|r| MemorySnapshot {
                used_memory: r.used,
                total_memory: r.total,
                available_memory: r.available,
            })
            .unwrap_or_default();
    }
}

#[derive(Debug, Default)]
pub struct BatteryManager {
    snapshot: BatterySnapshot,
    /// When the level last changed, and to what
    last_change: Option<(Instant, f32)>,
}

impl BatteryManager {
    pub fn snapshot(&self) -> BatterySnapshot {
        self.snapshot.clone()
    }

    pub fn refresh(&mut self, reading: Option<BatteryReading>) {
        self.refresh_at(reading, Instant::now());
    }

    /// Refresh with an explicit sample time; drain rate is measured between
    /// level changes while discharging.
    pub fn refresh_at(&mut self, reading: Option<BatteryReading>, now: Instant) {
        let Some(reading) = reading else {
            self.snapshot = BatterySnapshot::default();
            self.last_change = None;
            return;
        };

        let mut drain_rate = self.snapshot.drain_rate;
        if reading.charging {
            drain_rate = 0.0;
            self.last_change = Some((now, reading.level));
        } else {
            match self.last_change {
                Some((at, level)) if reading.level < level => {
                    let hours = now.duration_since(at).as_secs_f32() / 3600.0;
                    if hours > 0.0 {
                        drain_rate = (level - reading.level) / hours;
                    }
                    self.last_change = Some((now, reading.level));
                }
                Some((_, level)) if reading.level == level => {}
                _ => {
                    self.last_change = Some((now, reading.level));
                }
            }
        }

        self.snapshot = BatterySnapshot {
            level: reading.level,
            charging: reading.charging,
            drain_rate,
        };
    }
}

#[derive(Debug, Default)]
pub struct NetworkManager {
    snapshot: NetworkSnapshot,
}

impl NetworkManager {
    pub fn snapshot(&self) -> NetworkSnapshot {
        self.snapshot.clone()
    }

    pub fn refresh(&mut self, reading: Option<NetworkReading>) {
        self.snapshot = reading
            .map(|r| NetworkSnapshot {
                status: r.status,
                connection_type: r.connection_type,
                downlink_mbps: r.downlink_mbps,
                rtt_ms: r.rtt_ms,
            })
            .unwrap_or_default();
    }
}

/// The four resource managers of one monitor
pub struct ResourceManagers {
    pub hardware: HardwareManager,
    pub memory: MemoryManager,
    pub battery: BatteryManager,
    pub network: NetworkManager,
}

impl ResourceManagers {
    pub fn new(hardware_acceleration: bool) -> Self {
        Self {
            hardware: HardwareManager::new(hardware_acceleration),
            memory: MemoryManager::default(),
            battery: BatteryManager::default(),
            network: NetworkManager::default(),
        }
    }

    /// Overwrite every snapshot from the sampler
    pub fn refresh(&mut self, sampler: &mut dyn ResourceSampler) {
        self.hardware.refresh(sampler.hardware());
        self.memory.refresh(sampler.memory());
        self.battery.refresh(sampler.battery());
        self.network.refresh(sampler.network());
    }

    pub fn state(&self) -> ResourceState {
        ResourceState {
            hardware: self.hardware.snapshot(),
            memory: self.memory.snapshot(),
            battery: self.battery.snapshot(),
            network: self.network.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindvault_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_missing_instrumentation_uses_safe_defaults() {
        let mut managers = ResourceManagers::new(false);
        let mut sampler = StaticSampler::new();
        managers.refresh(&mut sampler);

        let state = managers.state();
        assert_eq!(state.battery.level, 100.0);
        assert!(!state.battery.charging);
        assert_eq!(state.network.status, NetworkStatus::Online);
        assert_eq!(state.hardware.cpu_usage, 0.0);
        assert_eq!(state.hardware.gpu_usage, 0.0);
        assert_eq!(state.memory.used_memory, 0);
    }

    #[test]
    fn test_refresh_overwrites_snapshot() {
        let mut managers = ResourceManagers::new(false);
        let mut sampler = StaticSampler::new();

        sampler.set_used_memory(500);
        managers.refresh(&mut sampler);
        assert_eq!(managers.memory.snapshot().used_memory, 500);

        sampler.set_used_memory(50);
        managers.refresh(&mut sampler);
        assert_eq!(managers.memory.snapshot().used_memory, 50);
    }

    #[test]
    fn test_refresh_keeps_acceleration_flag() {
        let mut managers = ResourceManagers::new(true);
        let mut sampler = StaticSampler::new();
        sampler.set_hardware(Some(HardwareReading {
            cpu_cores: 8,
            cpu_usage: 30.0,
            gpu_usage: Some(12.0),
        }));
        managers.refresh(&mut sampler);

        let hw = managers.hardware.snapshot();
        assert!(hw.hardware_acceleration);
        assert!(hw.gpu_available);
        assert_eq!(hw.cpu_cores, 8);
    }

    #[test]
    fn test_acceleration_hook_failure_does_not_roll_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut hardware = HardwareManager::new(false);
        hardware.set_acceleration_hook(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::hardware("gpu driver unavailable"))
        }));

        hardware.set_hardware_acceleration(true);
        assert!(hardware.snapshot().hardware_acceleration);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_hook_can_read_managers() {
        let resources = Arc::new(RwLock::new(ResourceManagers::new(false)));
        let seen = Arc::new(Mutex::new(None));

        let (inner, observed) = (Arc::clone(&resources), Arc::clone(&seen));
        resources
            .write()
            .hardware
            .set_acceleration_hook(Arc::new(move |_| {
                *observed.lock() = Some(inner.read().hardware.snapshot().hardware_acceleration);
                Ok(())
            }));

        set_shared_hardware_acceleration(&resources, true);
        assert_eq!(*seen.lock(), Some(true));
    }

    #[test]
    fn test_battery_drain_rate() {
        let mut battery = BatteryManager::default();
        let start = Instant::now();

        battery.refresh_at(Some(BatteryReading { level: 80.0, charging: false }), start);
        assert_eq!(battery.snapshot().drain_rate, 0.0);

        // 2% over half an hour
        let later = start + Duration::from_secs(1800);
        battery.refresh_at(Some(BatteryReading { level: 78.0, charging: false }), later);
        assert!((battery.snapshot().drain_rate - 4.0).abs() < 0.01);

        // plugging in resets the rate
        battery.refresh_at(Some(BatteryReading { level: 78.0, charging: true }), later);
        assert_eq!(battery.snapshot().drain_rate, 0.0);
    }

    #[test]
    fn test_battery_unavailable_resets() {
        let mut battery = BatteryManager::default();
        battery.refresh(Some(BatteryReading { level: 10.0, charging: false }));
        battery.refresh(None);
        assert_eq!(battery.snapshot(), BatterySnapshot::default());
    }

    #[test]
    fn test_system_sampler_reads_memory() {
        let mut sampler = SystemSampler::new();
        if let Some(memory) = sampler.memory() {
            assert!(memory.total >= memory.used);
        }
        assert!(sampler.battery().is_none());
        assert!(sampler.network().is_none());
    }
}
