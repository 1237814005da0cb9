//! Optimization strategy engine
//!
//! Strategies have no cooldown: one that stays eligible fires again on every
//! tick, so actions are expected to be idempotent.

use mindvault_core::{OptimizationStrategy, Platform, ResourceState, StrategyType};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::actions::ActionHandler;
use crate::condition::condition_holds;

/// Active strategies in insertion order
#[derive(Debug, Default)]
pub struct StrategyEngine {
    strategies: Vec<OptimizationStrategy>,
}

impl StrategyEngine {
    pub fn new(initial: Vec<OptimizationStrategy>) -> Self {
        let mut engine = Self::default();
        for strategy in initial {
            engine.add(strategy);
        }
        engine
    }

    /// Add a strategy. A strategy with the same id is replaced in place and
    /// keeps its insertion slot. Returns true when an existing one was replaced.
    pub fn add(&mut self, strategy: OptimizationStrategy) -> bool {
        if let Some(existing) = self.strategies.iter_mut().find(|s| s.id == strategy.id) {
            *existing = strategy;
            true
        } else {
            self.strategies.push(strategy);
            false
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.strategies.len();
        self.strategies.retain(|s| s.id != id);
        self.strategies.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&OptimizationStrategy> {
        self.strategies.iter().find(|s| s.id == id)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.strategies.iter_mut().find(|s| s.id == id) {
            Some(strategy) => {
                strategy.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn strategies(&self) -> &[OptimizationStrategy] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategies that should fire now, in dispatch order.
    ///
    /// Keeps enabled strategies for `platform` whose type is allowed, sorts
    /// them by ascending priority (stable, so ties keep insertion order) and
    /// keeps those whose conditions all hold.
    pub fn select(
        &self,
        platform: Platform,
        state: &ResourceState,
        type_allowed: impl Fn(StrategyType) -> bool,
    ) -> Vec<OptimizationStrategy> {
        let mut candidates: Vec<&OptimizationStrategy> = self
            .strategies
            .iter()
            .filter(|s| s.enabled && s.applies_to(platform) && type_allowed(s.strategy_type))
            .collect();
        candidates.sort_by_key(|s| s.priority);

        candidates
            .into_iter()
            .filter(|s| is_eligible(s, state))
            .cloned()
            .collect()
    }
}

/// True when every condition holds; stops at the first that does not
pub fn is_eligible(strategy: &OptimizationStrategy, state: &ResourceState) -> bool {
    strategy.conditions.iter().all(|c| condition_holds(c, state))
}

/// Fire every action of a strategy.
///
/// Actions without a delay run inline. Delayed actions run on their own
/// tokio task, which is neither awaited nor tracked.
pub fn dispatch(strategy: &OptimizationStrategy, handler: &Arc<dyn ActionHandler>) {
    debug!(
        "Dispatching strategy {} ({} actions)",
        strategy.id,
        strategy.actions.len()
    );

    for action in &strategy.actions {
        if action.delay_ms == 0 {
            handler.execute(&strategy.id, &action.action);
            continue;
        }

        let handler = Arc::clone(handler);
        let strategy_id = strategy.id.clone();
        let kind = action.action.clone();
        let delay = Duration::from_millis(action.delay_ms);

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    handler.execute(&strategy_id, &kind);
                });
            }
            Err(_) => {
                warn!(
                    "No async runtime for delayed action {} of {}, running it now",
                    kind.name(),
                    strategy_id
                );
                handler.execute(&strategy_id, &kind);
            }
        }
    }
}
