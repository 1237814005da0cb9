//! Power mode from battery state

use mindvault_core::{
    BatterySnapshot, CRITICAL_BATTERY_LEVEL, DEFAULT_POLL_INTERVAL_MS, LOW_BATTERY_LEVEL,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    Normal,
    Saver,
    Critical,
}

impl PowerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerMode::Normal => "normal",
            PowerMode::Saver => "saver",
            PowerMode::Critical => "critical",
        }
    }
}

impl std::fmt::Display for PowerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Power mode plus how often to poll in that mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerPolicy {
    pub mode: PowerMode,
    pub poll_interval_ms: u64,
    pub animations: bool,
    pub background_sync: bool,
}

impl PowerPolicy {
    /// Charging always runs in normal mode. Otherwise the level is compared
    /// with the low and critical thresholds (inclusive).
    pub fn for_battery(battery: &BatterySnapshot) -> Self {
        let mode = if battery.charging || battery.level > LOW_BATTERY_LEVEL {
            PowerMode::Normal
        } else if battery.level > CRITICAL_BATTERY_LEVEL {
            PowerMode::Saver
        } else {
            PowerMode::Critical
        };
        Self::for_mode(mode)
    }

    pub fn for_mode(mode: PowerMode) -> Self {
        match mode {
            PowerMode::Normal => Self {
                mode,
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
                animations: true,
                background_sync: true,
            },
            PowerMode::Saver => Self {
                mode,
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS * 5,
                animations: false,
                background_sync: true,
            },
            PowerMode::Critical => Self {
                mode,
                poll_interval_ms: DEFAULT_POLL_INTERVAL_MS * 30,
                animations: false,
                background_sync: false,
            },
        }
    }
}
