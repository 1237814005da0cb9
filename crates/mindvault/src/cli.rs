//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mindvault")]
#[command(version, about = "Performance monitor and library tools for Mind Vault")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (toml, yaml or json)
    #[arg(short, long, global = true, env = "MINDVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll resources and apply optimization strategies
    Monitor {
        /// Stop after this many ticks (runs until Ctrl-C otherwise)
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Show a one-off resource snapshot
    Snapshot,

    /// Print the effective configuration
    Config,

    /// Import an ebook (epub, mobi, pdf, txt, md)
    Import {
        /// Path to the ebook
        path: PathBuf,
    },

    /// Export JSON records to another format
    Export {
        /// JSON file holding the records
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Output format: json, csv, txt or md
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}
