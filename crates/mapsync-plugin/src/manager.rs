//! Plugin manager: registration, dependency-checked enable/disable, and
//! hook dispatch for all plugins.
//!
//! Every failure is logged here and returned as a [`PluginError`]. Plugin
//! callbacks never unwind through the manager; see [`crate::safety`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use mapsync_core::config::{PluginConfig, PluginSettings};

use crate::api::context::{PluginContext, merge_settings};
use crate::api::view::{EngineView, PluginStats};
use crate::error::PluginError;
use crate::hooks::definitions::{DispatchOptions, HookPoint};
use crate::hooks::dispatcher::{DispatchReport, HookDispatcher};
use crate::hooks::registry::HookRegistry;
use crate::registry::{EnableCheck, Plugin, PluginInfo, PluginRecord, PluginRegistry};
use crate::safety::{isolate, isolate_sync};

/// Construction-time engine settings.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Validate plugin definitions on register.
    pub validate: bool,
    /// Per-plugin default settings merged under `enable`'s settings.
    pub plugin_config: HashMap<String, PluginSettings>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            validate: true,
            plugin_config: HashMap::new(),
        }
    }
}

impl From<&PluginConfig> for EngineSettings {
    fn from(config: &PluginConfig) -> Self {
        Self {
            validate: config.validate,
            plugin_config: config.settings.clone(),
        }
    }
}

/// A plugin that could not be enabled by [`PluginManager::enable_configured`].
#[derive(Debug, Clone, Serialize)]
pub struct EnableFailure {
    /// Plugin name.
    pub plugin: String,
    /// Failure message.
    pub error: String,
}

/// Outcome of enabling the configured startup plugins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableReport {
    /// Plugins enabled (or already enabled), in enable order.
    pub enabled: Vec<String>,
    /// Plugins that failed to enable.
    pub failed: Vec<EnableFailure>,
}

/// Manages the plugin lifecycle and dispatches hooks.
#[derive(Debug)]
pub struct PluginManager {
    /// Engine settings.
    settings: EngineSettings,
    /// Plugin record store.
    plugin_registry: Arc<PluginRegistry>,
    /// Hook table.
    hook_registry: Arc<HookRegistry>,
    /// Hook dispatcher.
    hook_dispatcher: HookDispatcher,
}

impl PluginManager {
    /// Creates a plugin manager with default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    /// Creates a plugin manager with the given settings.
    pub fn with_settings(settings: EngineSettings) -> Self {
        let plugin_registry = Arc::new(PluginRegistry::new());
        let hook_registry = Arc::new(HookRegistry::new());
        let hook_dispatcher =
            HookDispatcher::new(Arc::clone(&hook_registry), Arc::clone(&plugin_registry));

        Self {
            settings,
            plugin_registry,
            hook_registry,
            hook_dispatcher,
        }
    }

    /// Creates a plugin manager from the `[plugins]` configuration section.
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::with_settings(EngineSettings::from(config))
    }

    /// Registers a plugin under `name`, disabled.
    ///
    /// The last registration under a name wins. An enabled plugin being
    /// replaced is disabled first, so enabled dependents block the
    /// replacement just as they block `disable`.
    pub async fn register(&self, name: &str, plugin: Arc<dyn Plugin>) -> Result<(), PluginError> {
        let record = match PluginRecord::new(name, plugin) {
            Ok(record) => record,
            Err(e) => {
                error!(plugin = %name, error = %e, "Plugin registration rejected");
                return Err(e);
            }
        };

        if self.settings.validate {
            if let Err(e) = record.validate() {
                error!(plugin = %name, error = %e, "Plugin registration rejected");
                return Err(e);
            }
        }

        if self.plugin_registry.is_enabled(name).await {
            if let Err(e) = self.disable(name).await {
                error!(plugin = %name, error = %e, "Plugin registration rejected");
                return Err(e);
            }
        }

        if self.plugin_registry.insert(record).await {
            warn!(plugin = %name, "Replaced previously registered plugin");
        }
        Ok(())
    }

    /// Disables (if needed) and removes a plugin.
    pub async fn unregister(&self, name: &str) -> Result<(), PluginError> {
        if !self.plugin_registry.contains(name).await {
            let err = PluginError::NotFound {
                name: name.to_string(),
            };
            error!(plugin = %name, error = %err, "Plugin unregister failed");
            return Err(err);
        }

        self.disable(name).await?;
        self.plugin_registry.remove(name).await?;

        info!(plugin = %name, "Plugin unregistered");
        Ok(())
    }

    /// Enables a plugin.
    ///
    /// Checks registration and dependencies, runs `initialize` with the
    /// merged settings, then binds the plugin's hooks. Nothing is bound if
    /// any step fails. Enabling an enabled plugin is a no-op.
    pub async fn enable(&self, name: &str, config: PluginSettings) -> Result<(), PluginError> {
        let plugin = match self.plugin_registry.check_enable(name).await {
            Ok(EnableCheck::AlreadyEnabled) => {
                debug!(plugin = %name, "Plugin already enabled");
                return Ok(());
            }
            Ok(EnableCheck::Ready(plugin)) => plugin,
            Err(e) => {
                error!(plugin = %name, error = %e, "Plugin enable failed");
                return Err(e);
            }
        };

        let defaults = self
            .settings
            .plugin_config
            .get(name)
            .cloned()
            .unwrap_or_default();
        let ctx = PluginContext::new(name, merge_settings(&defaults, config), self.view());

        if let Err(source) = isolate(plugin.initialize(&ctx)).await {
            let err = PluginError::Initialize {
                name: name.to_string(),
                source,
            };
            error!(plugin = %name, error = %err, "Plugin enable failed");
            return Err(err);
        }

        let handlers = match isolate_sync(|| plugin.hooks()) {
            Ok(handlers) => handlers,
            Err(source) => {
                if let Err(e) = isolate(plugin.cleanup()).await {
                    warn!(plugin = %name, error = %e, "Plugin cleanup returned error");
                }
                let err = PluginError::Initialize {
                    name: name.to_string(),
                    source,
                };
                error!(plugin = %name, error = %err, "Plugin enable failed");
                return Err(err);
            }
        };
        let hook_count = handlers.len();
        self.hook_registry.register_plugin(name, handlers).await;

        if let Err(e) = self.plugin_registry.mark_enabled(name).await {
            self.hook_registry.unregister_plugin(name).await;
            error!(plugin = %name, error = %e, "Plugin enable failed");
            return Err(e);
        }

        info!(plugin = %name, hooks = hook_count, "Plugin enabled");
        Ok(())
    }

    /// Disables a plugin.
    ///
    /// Unknown and already-disabled plugins succeed without change. Fails if
    /// an enabled plugin depends on this one. `cleanup` failures are logged
    /// and do not stop the disable.
    pub async fn disable(&self, name: &str) -> Result<(), PluginError> {
        if !self.plugin_registry.is_enabled(name).await {
            debug!(plugin = %name, "Plugin not enabled, nothing to disable");
            return Ok(());
        }

        let dependents = self.plugin_registry.enabled_dependents(name).await;
        if !dependents.is_empty() {
            let err = PluginError::HasDependents {
                name: name.to_string(),
                dependents,
            };
            warn!(plugin = %name, error = %err, "Plugin disable refused");
            return Err(err);
        }

        if let Some(plugin) = self.plugin_registry.plugin(name).await {
            if let Err(e) = isolate(plugin.cleanup()).await {
                warn!(plugin = %name, error = %e, "Plugin cleanup returned error");
            }
        }

        let removed = self.hook_registry.unregister_plugin(name).await;
        self.plugin_registry.mark_disabled(name).await;

        info!(plugin = %name, hooks = removed, "Plugin disabled");
        Ok(())
    }

    /// Enables the configured startup plugins in dependency order.
    ///
    /// Failures are collected, not returned; one failing plugin does not
    /// stop the others.
    pub async fn enable_configured(&self, names: &[String]) -> EnableReport {
        let order = match self.plugin_registry.enable_order(names).await {
            Ok(order) => order,
            Err(e) => {
                error!(error = %e, "Cannot order configured plugins, enabling as listed");
                names.to_vec()
            }
        };

        let mut report = EnableReport::default();
        for name in order {
            match self.enable(&name, PluginSettings::new()).await {
                Ok(()) => report.enabled.push(name),
                Err(e) => report.failed.push(EnableFailure {
                    plugin: name,
                    error: e.to_string(),
                }),
            }
        }

        info!(
            enabled = report.enabled.len(),
            failed = report.failed.len(),
            "Configured plugins processed"
        );
        report
    }

    /// Disables every enabled plugin, most recently enabled first.
    ///
    /// Returns the number of plugins disabled.
    pub async fn shutdown(&self) -> usize {
        let mut enabled = self.plugin_registry.enabled_names().await;
        enabled.reverse();

        let mut disabled = 0;
        for name in &enabled {
            match self.disable(name).await {
                Ok(()) => disabled += 1,
                Err(e) => error!(plugin = %name, error = %e, "Error disabling plugin"),
            }
        }

        info!(disabled, "All plugins disabled");
        disabled
    }

    /// Dispatches a hook and returns the resulting payload.
    ///
    /// Returns `Err` only when a handler fails and `options.stop_on_error`
    /// is set.
    pub async fn execute_hook(
        &self,
        hook: impl Into<HookPoint>,
        payload: Value,
        options: DispatchOptions,
    ) -> Result<Value, PluginError> {
        self.hook_dispatcher
            .dispatch(&hook.into(), payload, &options)
            .await
    }

    /// Dispatches a hook and returns the full dispatch report.
    pub async fn dispatch_report(
        &self,
        hook: impl Into<HookPoint>,
        payload: Value,
        options: DispatchOptions,
    ) -> Result<DispatchReport, PluginError> {
        self.hook_dispatcher
            .dispatch_report(&hook.into(), payload, &options)
            .await
    }

    /// Gets a plugin snapshot by name.
    pub async fn get_plugin(&self, name: &str) -> Option<PluginInfo> {
        self.plugin_registry.get(name).await
    }

    /// Lists plugin snapshots, optionally filtered by enabled state.
    pub async fn list_plugins(&self, enabled: Option<bool>) -> Vec<PluginInfo> {
        self.plugin_registry.list(enabled).await
    }

    /// Registered plugins that declare `name` as a dependency.
    pub async fn dependents(&self, name: &str) -> Vec<String> {
        self.plugin_registry.dependents(name).await
    }

    /// Checks whether a plugin is enabled.
    pub async fn is_enabled(&self, name: &str) -> bool {
        self.plugin_registry.is_enabled(name).await
    }

    /// Returns engine statistics.
    pub async fn stats(&self) -> PluginStats {
        self.view().stats().await
    }

    /// Returns a read-only view of the engine.
    pub fn view(&self) -> EngineView {
        EngineView::new(
            Arc::clone(&self.plugin_registry),
            Arc::clone(&self.hook_registry),
        )
    }

    /// Returns the hook registry.
    pub fn hook_registry(&self) -> &Arc<HookRegistry> {
        &self.hook_registry
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
