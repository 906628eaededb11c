//! Plugin listing command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mapsync_core::error::AppError;
use mapsync_plugin::PluginInfo;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};

/// Arguments for the plugins command
#[derive(Debug, Args)]
pub struct PluginsArgs {
    /// Only enabled plugins
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,

    /// Only disabled plugins
    #[arg(long)]
    pub disabled: bool,
}

impl PluginsArgs {
    fn filter(&self) -> Option<bool> {
        match (self.enabled, self.disabled) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// One row of the plugin table
#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Enabled")]
    enabled: bool,
    #[tabled(rename = "Depends On")]
    dependencies: String,
    #[tabled(rename = "Hooks")]
    hooks: String,
    #[tabled(rename = "Registered")]
    registered_at: String,
}

impl From<&PluginInfo> for PluginRow {
    fn from(info: &PluginInfo) -> Self {
        Self {
            name: info.name.clone(),
            version: info.version.clone(),
            enabled: info.enabled,
            dependencies: info.dependencies.join(", "),
            hooks: info
                .hooks
                .iter()
                .map(|hook| hook.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            registered_at: info.registered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute the plugins command
pub async fn execute(
    args: &PluginsArgs,
    engine: &Engine,
    format: OutputFormat,
) -> Result<(), AppError> {
    let plugins = engine.manager.list_plugins(args.filter()).await;

    match format {
        OutputFormat::Json => output::print_json(&plugins),
        OutputFormat::Table => {
            let rows: Vec<PluginRow> = plugins.iter().map(PluginRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
