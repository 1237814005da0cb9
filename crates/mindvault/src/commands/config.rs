//! Config command implementation

use anyhow::Result;
use std::path::Path;

use crate::output::print_json;

/// Print the effective configuration as JSON
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    print_json(&config);
    Ok(())
}
