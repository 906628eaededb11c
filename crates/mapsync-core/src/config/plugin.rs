//! Plugin engine configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Free-form settings object handed to a plugin's `initialize` callback.
pub type PluginSettings = serde_json::Map<String, serde_json::Value>;

/// Plugin engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Whether plugin definitions are structurally validated on register.
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Plugins to enable at startup, in any order.
    #[serde(default)]
    pub enabled: Vec<String>,
    /// Per-plugin default settings, keyed by plugin name.
    #[serde(default)]
    pub settings: HashMap<String, PluginSettings>,
}

impl PluginConfig {
    /// Returns the configured defaults for a plugin (empty when unset).
    pub fn settings_for(&self, name: &str) -> PluginSettings {
        self.settings.get(name).cloned().unwrap_or_default()
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            validate: default_true(),
            enabled: Vec::new(),
            settings: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
