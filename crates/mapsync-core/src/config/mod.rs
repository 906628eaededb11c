//! Application configuration schemas.
//!
//! The configuration is read once at startup. Files are TOML, merged by the
//! `config` crate: `config/default.toml`, then `config/<env>.toml`, then
//! environment variables prefixed with `MAPSYNC__`. Every field carries a
//! serde default, so an absent file yields a working configuration.

pub mod logging;
pub mod plugin;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::plugin::{PluginConfig, PluginSettings};

use crate::error::AppError;

/// Directory searched by [`AppConfig::load`].
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Plugin engine settings.
    #[serde(default)]
    pub plugins: PluginConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the default `config/` directory.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from(DEFAULT_CONFIG_DIR, env)
    }

    /// Load configuration from `dir`.
    ///
    /// Merges `<dir>/default.*` with an environment-specific overlay
    /// `<dir>/<env>.*` and environment variables such as
    /// `MAPSYNC__PLUGINS__VALIDATE=false`. `MAPSYNC__PLUGINS__ENABLED` is
    /// parsed as a comma-separated list.
    pub fn load_from(dir: impl AsRef<Path>, env: &str) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let default_path = dir.join("default");
        let env_path = dir.join(env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_path.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("MAPSYNC")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("plugins.enabled")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
