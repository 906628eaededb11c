//! Engine statistics command.

use mapsync_core::error::AppError;

use crate::engine::Engine;
use crate::output::{self, OutputFormat};

/// Execute the stats command
pub async fn execute(engine: &Engine, format: OutputFormat) -> Result<(), AppError> {
    let stats = engine.manager.stats().await;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Table => {
            println!("Plugin engine");
            output::print_kv("Registered", &stats.total.to_string());
            output::print_kv("Enabled", &stats.enabled.to_string());
            output::print_kv("Disabled", &stats.disabled.to_string());
            output::print_kv("Active hooks", &stats.hooks.to_string());
            output::print_kv("Enabled plugins", &stats.enabled_plugins.join(", "));
            output::print_kv("Available hooks", &stats.available_hooks.join(", "));

            for failure in &engine.startup.failed {
                output::print_warning(&format!(
                    "'{}' not enabled at startup: {}",
                    failure.plugin, failure.error
                ));
            }
        }
    }

    Ok(())
}
