//! Read-only engine view handed to plugins and callers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hooks::definitions::HookPoint;
use crate::hooks::registry::HookRegistry;
use crate::registry::{PluginInfo, PluginRegistry};

/// Engine statistics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStats {
    /// Registered plugins.
    pub total: usize,
    /// Enabled plugins.
    pub enabled: usize,
    /// Registered but disabled plugins.
    pub disabled: usize,
    /// Hook points with at least one live binding.
    pub hooks: usize,
    /// Enabled plugin names in enable order.
    pub enabled_plugins: Vec<String>,
    /// Hook names with at least one live binding, sorted.
    pub available_hooks: Vec<String>,
}

/// Read-only handle over the engine's stores.
///
/// Cloning is cheap. The view exposes snapshots only; it cannot enable,
/// disable or register anything.
#[derive(Debug, Clone)]
pub struct EngineView {
    plugins: Arc<PluginRegistry>,
    hooks: Arc<HookRegistry>,
}

impl EngineView {
    /// Creates a view over the given stores.
    pub fn new(plugins: Arc<PluginRegistry>, hooks: Arc<HookRegistry>) -> Self {
        Self { plugins, hooks }
    }

    /// Returns engine statistics.
    pub async fn stats(&self) -> PluginStats {
        let total = self.plugins.count().await;
        let enabled_plugins = self.plugins.enabled_names().await;
        let available_hooks: Vec<String> = self
            .hooks
            .registered_hooks()
            .await
            .into_iter()
            .map(String::from)
            .collect();

        PluginStats {
            total,
            enabled: enabled_plugins.len(),
            disabled: total.saturating_sub(enabled_plugins.len()),
            hooks: available_hooks.len(),
            enabled_plugins,
            available_hooks,
        }
    }

    /// Gets a plugin snapshot by name.
    pub async fn get_plugin(&self, name: &str) -> Option<PluginInfo> {
        self.plugins.get(name).await
    }

    /// Lists plugin snapshots, optionally filtered by enabled state.
    pub async fn list_plugins(&self, enabled: Option<bool>) -> Vec<PluginInfo> {
        self.plugins.list(enabled).await
    }

    /// Checks whether a plugin is enabled.
    pub async fn is_enabled(&self, name: &str) -> bool {
        self.plugins.is_enabled(name).await
    }

    /// Plugins bound to a hook point, in dispatch order.
    pub async fn bindings_for(&self, hook: &HookPoint) -> Vec<String> {
        self.hooks.plugins_for(hook).await
    }
}
