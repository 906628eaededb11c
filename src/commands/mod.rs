//! CLI command definitions and dispatch.

pub mod cycle;
pub mod dispatch;
pub mod plugins;
pub mod stats;

use clap::{Parser, Subcommand};
use serde_json::Value;

use mapsync_core::error::AppError;

use crate::engine::Engine;
use crate::output::OutputFormat;

/// mapsync: plugin engine diagnostics
#[derive(Debug, Parser)]
#[command(name = "mapsync", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and <env>.toml
    #[arg(long, default_value = mapsync_core::config::DEFAULT_CONFIG_DIR)]
    pub config_dir: String,

    /// Configuration environment overlay
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered plugins
    Plugins(plugins::PluginsArgs),
    /// Show engine statistics
    Stats,
    /// Dispatch a hook with a JSON payload
    Dispatch(dispatch::DispatchArgs),
    /// Run one operation through the operation hooks
    Cycle(cycle::CycleArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, engine: &Engine) -> Result<(), AppError> {
        match &self.command {
            Commands::Plugins(args) => plugins::execute(args, engine, self.format).await,
            Commands::Stats => stats::execute(engine, self.format).await,
            Commands::Dispatch(args) => dispatch::execute(args, engine, self.format).await,
            Commands::Cycle(args) => cycle::execute(args, engine, self.format).await,
        }
    }
}

/// Helper: parse an optional JSON payload argument (absent means `null`)
pub fn parse_payload(raw: Option<&str>) -> Result<Value, AppError> {
    match raw {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid JSON payload: {}", e))),
        None => Ok(Value::Null),
    }
}
