//! Monitor command implementation

use anyhow::Result;
use mindvault_perf::PerformanceMonitor;
use std::path::Path;
use tracing::info;

use crate::output::{is_json_mode, print_info, print_tick};

/// Poll in the foreground until `ticks` have run or Ctrl-C is pressed
pub async fn execute(config_path: Option<&Path>, ticks: Option<u64>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let monitor = PerformanceMonitor::new(config);

    if !is_json_mode() {
        print_info(&format!(
            "Monitoring every {}ms on {:?} ({} strategies), Ctrl-C to stop",
            monitor.poll_interval().as_millis(),
            monitor.platform(),
            monitor.strategies().len()
        ));
    }

    loop {
        if ticks.is_some_and(|limit| monitor.tick_count() >= limit) {
            break;
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            _ = tokio::time::sleep(monitor.poll_interval()) => {
                let report = monitor.tick();
                print_tick(monitor.tick_count(), &report, &monitor.optimizations());
            }
        }
    }

    let stats = monitor.get_performance_stats(None);
    info!("Stopped after {} ticks ({} metrics)", monitor.tick_count(), stats.count);
    Ok(())
}
