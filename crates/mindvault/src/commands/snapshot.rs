//! Snapshot command implementation

use anyhow::Result;
use mindvault_mobile::PowerPolicy;
use mindvault_perf::PerformanceMonitor;
use std::path::Path;

use crate::output::print_snapshot;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let monitor = PerformanceMonitor::new(config);

    let resources = monitor.resources();
    let power = PowerPolicy::for_battery(&resources.battery);
    print_snapshot(&resources, &power);
    Ok(())
}
