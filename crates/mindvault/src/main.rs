//! Mind Vault CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    output::set_json_mode(cli.json);

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mindvault={}", log_level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Monitor { ticks } => monitor::execute(config_path, ticks).await,
        Commands::Snapshot => snapshot::execute(config_path),
        Commands::Config => config::execute(config_path),
        Commands::Import { path } => import::execute(&path).await,
        Commands::Export {
            input,
            output,
            format,
        } => export::execute(&input, &output, &format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
