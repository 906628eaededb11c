//! Shared test helpers for integration tests.

use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;

use mapsync_core::config::{AppConfig, PluginSettings};
use mapsync_core::error::AppError;
use mapsync_plugin::{HookAction, Plugin, PluginDefinition, PluginManager};
use plugin_logging::LoggingPlugin;
use plugin_performance::PerformancePlugin;

/// Test engine: a manager plus the built-in plugins, registered but not
/// enabled.
pub struct TestEngine {
    /// Plugin manager
    pub manager: PluginManager,
    /// Built-in performance plugin
    pub performance: Arc<PerformancePlugin>,
    /// Built-in logging plugin
    pub logging: Arc<LoggingPlugin>,
    /// Loaded configuration
    pub config: AppConfig,
    _dir: TempDir,
}

impl TestEngine {
    /// Build an engine from a `default.toml` body.
    pub async fn from_toml(toml: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("default.toml"), toml).expect("Failed to write config");
        let config = AppConfig::load_from(dir.path(), "test").expect("Failed to load test config");

        let manager = PluginManager::from_config(&config.plugins);
        let performance = Arc::new(PerformancePlugin::new());
        let logging = Arc::new(LoggingPlugin::new());
        manager
            .register(plugin_performance::PLUGIN_NAME, performance.clone())
            .await
            .expect("Failed to register performance plugin");
        manager
            .register(plugin_logging::PLUGIN_NAME, logging.clone())
            .await
            .expect("Failed to register logging plugin");

        Self {
            manager,
            performance,
            logging,
            config,
            _dir: dir,
        }
    }

    /// Enable the plugins listed in `plugins.enabled`.
    pub async fn enable_configured(&self) -> mapsync_plugin::EnableReport {
        self.manager
            .enable_configured(&self.config.plugins.enabled)
            .await
    }
}

/// Register and enable `plugins` in order.
pub async fn enable_all(manager: &PluginManager, plugins: Vec<(&str, Arc<dyn Plugin>)>) {
    for (name, plugin) in plugins {
        manager.register(name, plugin).await.expect("Failed to register");
        manager
            .enable(name, PluginSettings::new())
            .await
            .expect("Failed to enable");
    }
}

/// A plugin whose handler on `hook` maps a numeric payload with `f`.
pub fn arithmetic(hook: &str, f: fn(i64) -> i64) -> Arc<dyn Plugin> {
    PluginDefinition::builder("1.0.0")
        .on_sync(hook, move |payload, _options| {
            let n = payload
                .as_i64()
                .ok_or_else(|| AppError::validation("expected a number"))?;
            Ok(HookAction::ContinueWith(json!(f(n))))
        })
        .into_plugin()
}

/// A plugin whose handler on `hook` always fails.
pub fn failing(hook: &str) -> Arc<dyn Plugin> {
    PluginDefinition::builder("1.0.0")
        .on_sync(hook, |_payload, _options| Err(AppError::internal("handler exploded")))
        .into_plugin()
}

/// A plugin that depends on `dependencies` and binds a no-op handler on `hook`.
pub fn with_dependencies(hook: &str, dependencies: &[&str]) -> Arc<dyn Plugin> {
    dependencies
        .iter()
        .fold(PluginDefinition::builder("1.0.0"), |builder, dep| {
            builder.depends_on(dep)
        })
        .on_sync(hook, |_payload, _options| Ok(HookAction::Continue))
        .into_plugin()
}

/// Extract a numeric result.
pub fn as_number(value: &Value) -> i64 {
    value.as_i64().expect("numeric result")
}
