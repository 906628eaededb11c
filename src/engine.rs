//! Engine wiring: plugin manager plus the built-in plugins.

use std::sync::Arc;

use tracing::{info, warn};

use mapsync_core::config::AppConfig;
use mapsync_core::error::AppError;
use mapsync_plugin::{EnableReport, PluginManager};
use plugin_logging::LoggingPlugin;
use plugin_performance::PerformancePlugin;

/// A started engine with handles to the built-in plugins.
pub struct Engine {
    /// The plugin manager.
    pub manager: PluginManager,
    /// Built-in performance plugin.
    pub performance: Arc<PerformancePlugin>,
    /// Built-in logging plugin.
    pub logging: Arc<LoggingPlugin>,
    /// Outcome of enabling the configured plugins.
    pub startup: EnableReport,
}

impl Engine {
    /// Registers the built-ins and enables `plugins.enabled`.
    pub async fn start(config: &AppConfig) -> Result<Self, AppError> {
        let manager = PluginManager::from_config(&config.plugins);

        let performance = Arc::new(PerformancePlugin::new());
        let logging = Arc::new(LoggingPlugin::new());
        manager
            .register(plugin_performance::PLUGIN_NAME, performance.clone())
            .await?;
        manager
            .register(plugin_logging::PLUGIN_NAME, logging.clone())
            .await?;

        let startup = manager.enable_configured(&config.plugins.enabled).await;
        for failure in &startup.failed {
            warn!(
                plugin = %failure.plugin,
                error = %failure.error,
                "Configured plugin not enabled"
            );
        }
        info!(enabled = ?startup.enabled, "Plugin engine ready");

        Ok(Self {
            manager,
            performance,
            logging,
            startup,
        })
    }

    /// Disables every enabled plugin.
    pub async fn shutdown(&self) {
        self.manager.shutdown().await;
    }
}
