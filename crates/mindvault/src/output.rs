//! Terminal output formatting

use colored::Colorize;
use mindvault_core::ResourceState;
use mindvault_mobile::PowerPolicy;
use mindvault_perf::{OptimizationState, TickReport};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "resource")]
    resource: String,
    #[tabled(rename = "value")]
    value: String,
}

impl ResourceRow {
    fn new(resource: &str, value: String) -> Self {
        Self {
            resource: resource.to_string(),
            value,
        }
    }
}

/// JSON form of a snapshot
#[derive(Serialize)]
pub struct SnapshotJson<'a> {
    #[serde(flatten)]
    pub resources: &'a ResourceState,
    pub memory_percent: f64,
    pub power: PowerPolicy,
}

pub fn print_snapshot(resources: &ResourceState, power: &PowerPolicy) {
    if is_json_mode() {
        print_json(&SnapshotJson {
            resources,
            memory_percent: resources.memory.usage_percent(),
            power: *power,
        });
        return;
    }

    let hw = &resources.hardware;
    let mem = &resources.memory;
    let battery = &resources.battery;
    let net = &resources.network;

    let rows = vec![
        ResourceRow::new("cpu cores", hw.cpu_cores.to_string()),
        ResourceRow::new("cpu", format_percent(hw.cpu_usage as f64, 80.0)),
        ResourceRow::new(
            "gpu",
            if hw.gpu_available {
                format!("{:.1}%", hw.gpu_usage)
            } else {
                "-".to_string()
            },
        ),
        ResourceRow::new(
            "hw accel",
            if hw.hardware_acceleration {
                "on".green().to_string()
            } else {
                "off".dimmed().to_string()
            },
        ),
        ResourceRow::new(
            "memory",
            format!(
                "{} / {} ({})",
                format_bytes(mem.used_memory),
                format_bytes(mem.total_memory),
                format_percent(mem.usage_percent(), 85.0)
            ),
        ),
        ResourceRow::new("available", format_bytes(mem.available_memory)),
        ResourceRow::new(
            "battery",
            format!(
                "{:.0}%{}",
                battery.level,
                if battery.charging { " (charging)" } else { "" }
            ),
        ),
        ResourceRow::new("network", format!("{:?}", net.status).to_lowercase()),
        ResourceRow::new("power mode", power.mode.to_string()),
    ];

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

/// JSON form of one monitor tick
#[derive(Serialize)]
pub struct TickJson<'a> {
    pub tick: u64,
    pub violations: Vec<String>,
    pub fired: &'a [String],
    pub optimizations: &'a OptimizationState,
}

pub fn print_tick(tick: u64, report: &TickReport, optimizations: &OptimizationState) {
    if is_json_mode() {
        // one object per line so the stream can be consumed incrementally
        let line = TickJson {
            tick,
            violations: report.violations.iter().map(|v| v.to_string()).collect(),
            fired: &report.fired,
            optimizations,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    let fired = if report.fired.is_empty() {
        "-".dimmed().to_string()
    } else {
        report.fired.join(", ").cyan().to_string()
    };
    println!(
        "{} {}  fired: {}  quality: {}%  cache clears: {}",
        "tick".bold(),
        tick,
        fired,
        optimizations.quality_level,
        optimizations.cache_clears
    );
    for violation in &report.violations {
        println!("  {} {}", "!".yellow(), violation);
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

fn format_percent(value: f64, warn_at: f64) -> String {
    let text = format!("{:.1}%", value);
    if value >= warn_at {
        text.red().to_string()
    } else {
        text
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1}G", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1}M", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.0}K", bytes as f64 / 1024.0)
    } else {
        format!("{}B", bytes)
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// JSON wrapper for command results
#[derive(Serialize)]
pub struct ResponseJson<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn print_result<T: Serialize>(success: bool, message: &str, data: Option<T>) {
    if is_json_mode() {
        print_json(&ResponseJson {
            success,
            message: Some(message.to_string()),
            data,
        });
    } else if success {
        print_success(message);
    } else {
        print_error(message);
    }
}
