//! Plugin context: what a plugin receives when it is initialized.

use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

use mapsync_core::config::PluginSettings;

use crate::error::PluginError;

use super::view::EngineView;

/// Context passed to [`Plugin::initialize`](crate::registry::Plugin::initialize).
///
/// `config` is the engine-level defaults for the plugin shallow-merged with
/// the settings passed to `enable`; caller keys win.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Name the plugin is registered under.
    pub plugin_name: String,
    /// Merged plugin settings.
    pub config: PluginSettings,
    /// Read-only engine view.
    pub engine: EngineView,
}

impl PluginContext {
    /// Creates a new context.
    pub fn new(plugin_name: &str, config: PluginSettings, engine: EngineView) -> Self {
        Self {
            plugin_name: plugin_name.to_string(),
            config,
            engine,
        }
    }

    /// Gets a raw setting value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    /// Deserializes the merged settings into a typed struct.
    pub fn settings<T: DeserializeOwned>(&self) -> Result<T, PluginError> {
        serde_json::from_value(Value::Object(self.config.clone())).map_err(|e| {
            PluginError::Settings {
                name: self.plugin_name.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Deserializes and validates the merged settings.
    pub fn validated_settings<T: DeserializeOwned + Validate>(&self) -> Result<T, PluginError> {
        let settings: T = self.settings()?;
        settings.validate().map_err(|e| PluginError::Settings {
            name: self.plugin_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(settings)
    }
}

/// Shallow-merges `overrides` over `defaults`.
pub fn merge_settings(defaults: &PluginSettings, overrides: PluginSettings) -> PluginSettings {
    let mut merged = defaults.clone();
    merged.extend(overrides);
    merged
}
