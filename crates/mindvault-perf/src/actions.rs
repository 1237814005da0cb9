//! Action handlers for optimization strategies

use mindvault_core::ActionKind;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::resources::{set_shared_hardware_acceleration, ResourceManagers};

/// Executes strategy actions. Implementations must not fail: dispatch does
/// not retry and nothing is reported back to the strategy.
pub trait ActionHandler: Send + Sync {
    fn execute(&self, strategy_id: &str, action: &ActionKind);
}

/// Optimizations currently in effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationState {
    pub cache_clears: u64,
    pub animations_reduced: bool,
    /// Render quality in percent
    pub quality_level: u8,
    /// Poll interval override set by throttling
    pub polling_interval_ms: Option<u64>,
    pub background_paused: bool,
    pub actions_executed: u64,
}

impl Default for OptimizationState {
    fn default() -> Self {
        Self {
            cache_clears: 0,
            animations_reduced: false,
            quality_level: 100,
            polling_interval_ms: None,
            background_paused: false,
            actions_executed: 0,
        }
    }
}

/// Default handler: applies actions to the monitor's optimization state and
/// its hardware manager
pub struct ResourceActionHandler {
    resources: Arc<RwLock<ResourceManagers>>,
    state: Arc<RwLock<OptimizationState>>,
}

impl ResourceActionHandler {
    pub fn new(
        resources: Arc<RwLock<ResourceManagers>>,
        state: Arc<RwLock<OptimizationState>>,
    ) -> Self {
        Self { resources, state }
    }
}

impl ActionHandler for ResourceActionHandler {
    fn execute(&self, strategy_id: &str, action: &ActionKind) {
        info!("Strategy {} executing {}", strategy_id, action.name());

        match action {
            ActionKind::EnableHardwareAcceleration => {
                set_shared_hardware_acceleration(&self.resources, true);
            }
            ActionKind::DisableHardwareAcceleration => {
                set_shared_hardware_acceleration(&self.resources, false);
            }
            _ => {}
        }

        let mut state = self.state.write();
        state.actions_executed += 1;
        match action {
            ActionKind::ClearCache => state.cache_clears += 1,
            ActionKind::ReduceAnimations => state.animations_reduced = true,
            ActionKind::RestoreAnimations => state.animations_reduced = false,
            ActionKind::ReduceQuality { level } => {
                state.quality_level = state.quality_level.min((*level).min(100));
            }
            ActionKind::RestoreQuality => state.quality_level = 100,
            ActionKind::ThrottlePolling { interval_ms } => {
                state.polling_interval_ms = Some(*interval_ms);
            }
            ActionKind::PauseBackgroundTasks => state.background_paused = true,
            ActionKind::ResumeBackgroundTasks => {
                state.background_paused = false;
                state.polling_interval_ms = None;
            }
            ActionKind::EnableHardwareAcceleration | ActionKind::DisableHardwareAcceleration => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Shared = (
        ResourceActionHandler,
        Arc<RwLock<ResourceManagers>>,
        Arc<RwLock<OptimizationState>>,
    );

    fn handler() -> Shared {
        let resources = Arc::new(RwLock::new(ResourceManagers::new(false)));
        let state = Arc::new(RwLock::new(OptimizationState::default()));
        let handler = ResourceActionHandler::new(Arc::clone(&resources), Arc::clone(&state));
        (handler, resources, state)
    }

    #[test]
    fn test_hardware_acceleration_actions() {
        let (handler, resources, _) = handler();

        handler.execute("s", &ActionKind::EnableHardwareAcceleration);
        assert!(resources.read().hardware.snapshot().hardware_acceleration);

        handler.execute("s", &ActionKind::DisableHardwareAcceleration);
        assert!(!resources.read().hardware.snapshot().hardware_acceleration);
    }

    #[test]
    fn test_quality_only_goes_down_until_restored() {
        let (handler, _, state) = handler();

        handler.execute("s", &ActionKind::ReduceQuality { level: 60 });
        handler.execute("s", &ActionKind::ReduceQuality { level: 80 });
        assert_eq!(state.read().quality_level, 60);

        handler.execute("s", &ActionKind::RestoreQuality);
        assert_eq!(state.read().quality_level, 100);
    }

    #[test]
    fn test_throttle_and_resume() {
        let (handler, _, state) = handler();

        handler.execute("s", &ActionKind::ThrottlePolling { interval_ms: 5000 });
        handler.execute("s", &ActionKind::PauseBackgroundTasks);
        assert_eq!(state.read().polling_interval_ms, Some(5000));
        assert!(state.read().background_paused);

        handler.execute("s", &ActionKind::ResumeBackgroundTasks);
        assert_eq!(state.read().polling_interval_ms, None);
        assert!(!state.read().background_paused);
        assert_eq!(state.read().actions_executed, 3);
    }
}
