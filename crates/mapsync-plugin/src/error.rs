//! Error type for the plugin engine.
//!
//! Each variant is one failure class of the engine contract. The engine logs
//! every failure where it happens and returns it; nothing is raised past the
//! engine boundary except a handler failure under `stop_on_error`.

use mapsync_core::error::AppError;
use thiserror::Error;

/// Unified error type for plugin lifecycle and hook dispatch.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin definition is structurally invalid.
    #[error("Plugin '{name}' failed validation: {reason}")]
    Validation {
        /// Plugin name.
        name: String,
        /// What was wrong with the definition.
        reason: String,
    },

    /// No plugin is registered under this name.
    #[error("Plugin '{name}' not found")]
    NotFound {
        /// Plugin name.
        name: String,
    },

    /// A declared dependency is not enabled.
    #[error("Plugin '{name}' requires dependency '{dependency}' which is not enabled")]
    DependencyNotEnabled {
        /// Plugin being enabled.
        name: String,
        /// First missing dependency in declaration order.
        dependency: String,
    },

    /// Enabled plugins still depend on the plugin being disabled.
    #[error("Cannot disable plugin '{name}': plugins {} depend on it", .dependents.join(", "))]
    HasDependents {
        /// Plugin being disabled.
        name: String,
        /// Enabled plugins that depend on it.
        dependents: Vec<String>,
    },

    /// The plugin is enabled and cannot be removed.
    #[error("Plugin '{name}' is enabled; disable it first")]
    AlreadyEnabled {
        /// Plugin name.
        name: String,
    },

    /// The plugin's `initialize` callback failed.
    #[error("Plugin '{name}' failed to initialize: {source}")]
    Initialize {
        /// Plugin name.
        name: String,
        /// Failure reported by the plugin.
        #[source]
        source: AppError,
    },

    /// A hook handler failed while `stop_on_error` was set.
    #[error("Hook '{hook}' failed in plugin '{plugin}': {source}")]
    Handler {
        /// Hook name.
        hook: String,
        /// Owning plugin.
        plugin: String,
        /// Failure reported by the handler.
        #[source]
        source: AppError,
    },

    /// Requested plugins depend on each other in a cycle.
    #[error("Dependency cycle detected among plugins: {}", .plugins.join(" -> "))]
    DependencyCycle {
        /// Plugins that form or feed the cycle.
        plugins: Vec<String>,
    },

    /// Plugin settings could not be parsed or failed validation.
    #[error("Invalid settings for plugin '{name}': {reason}")]
    Settings {
        /// Plugin name.
        name: String,
        /// Parse or validation message.
        reason: String,
    },
}

impl From<PluginError> for AppError {
    fn from(err: PluginError) -> Self {
        match &err {
            PluginError::NotFound { .. } => AppError::not_found(err.to_string()),
            PluginError::Validation { .. } | PluginError::Settings { .. } => {
                AppError::validation(err.to_string())
            }
            PluginError::DependencyNotEnabled { .. }
            | PluginError::HasDependents { .. }
            | PluginError::AlreadyEnabled { .. }
            | PluginError::DependencyCycle { .. } => AppError::conflict(err.to_string()),
            PluginError::Initialize { .. } | PluginError::Handler { .. } => {
                AppError::plugin(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsync_core::error::ErrorKind;

    #[test]
    fn test_has_dependents_message_lists_plugins() {
        let err = PluginError::HasDependents {
            name: "base".to_string(),
            dependents: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Cannot disable plugin 'base': plugins a, b depend on it"
        );
    }

    #[test]
    fn test_maps_to_app_error_kinds() {
        let not_found: AppError = PluginError::NotFound {
            name: "x".to_string(),
        }
        .into();
        assert_eq!(not_found.kind, ErrorKind::NotFound);

        let missing: AppError = PluginError::DependencyNotEnabled {
            name: "x".to_string(),
            dependency: "y".to_string(),
        }
        .into();
        assert_eq!(missing.kind, ErrorKind::Conflict);

        let handler: AppError = PluginError::Handler {
            hook: "x".to_string(),
            plugin: "p".to_string(),
            source: AppError::internal("boom"),
        }
        .into();
        assert_eq!(handler.kind, ErrorKind::Plugin);
    }
}
