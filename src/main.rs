//! mapsync: plugin engine diagnostic CLI.
//!
//! Loads configuration, installs logging, starts the plugin engine with the
//! built-in plugins and runs one command against it.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use mapsync_core::config::{AppConfig, LoggingConfig};

mod commands;
mod engine;
mod output;

use commands::Cli;
use engine::Engine;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config_dir, &cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    let engine = match Engine::start(&config).await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Engine startup failed");
            std::process::exit(1);
        }
    };

    let result = cli.execute(&engine).await;
    engine.shutdown().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. Logs go to stderr so command output stays clean.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
