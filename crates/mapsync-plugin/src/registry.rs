//! Plugin registry: the record store holding every registered plugin, its
//! metadata, and the enabled set.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use mapsync_core::result::AppResult;

use crate::api::context::PluginContext;
use crate::dependency::{self, DependencyNode};
use crate::error::PluginError;
use crate::hooks::definitions::HookPoint;
use crate::hooks::registry::HookHandler;
use crate::safety::isolate_sync;

/// Trait that all plugins must implement.
///
/// Only `version` and `hooks` are required; `initialize` and `cleanup` are
/// optional capabilities with no-op defaults.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Plugin version string. Must be non-empty when validation is on.
    fn version(&self) -> &str;

    /// Plugin description.
    fn description(&self) -> &str {
        ""
    }

    /// Plugins that must be enabled before this one, in declaration order.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Hook handlers this plugin binds while enabled.
    fn hooks(&self) -> Vec<(HookPoint, Arc<dyn HookHandler>)>;

    /// Called once per enable, before any hook is bound.
    async fn initialize(&self, _ctx: &PluginContext) -> AppResult<()> {
        Ok(())
    }

    /// Called once per disable, before hooks are unbound.
    async fn cleanup(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Read-only snapshot of a registered plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Declared dependencies.
    pub dependencies: Vec<String>,
    /// Hook points the plugin binds.
    pub hooks: Vec<HookPoint>,
    /// Whether the plugin is currently enabled.
    pub enabled: bool,
    /// When the plugin was (last) registered.
    pub registered_at: DateTime<Utc>,
}

/// Stored record for one registered plugin.
#[derive(Debug, Clone)]
pub struct PluginRecord {
    /// The plugin instance.
    pub plugin: Arc<dyn Plugin>,
    /// Metadata captured at registration.
    pub info: PluginInfo,
}

impl PluginRecord {
    /// Captures a record for a freshly registered, disabled plugin.
    ///
    /// Fails if the plugin panics while reporting its metadata.
    pub fn new(name: &str, plugin: Arc<dyn Plugin>) -> Result<Self, PluginError> {
        let metadata = isolate_sync(|| {
            (
                plugin.version().to_string(),
                plugin.description().to_string(),
                plugin.dependencies(),
                plugin
                    .hooks()
                    .into_iter()
                    .map(|(hook, _)| hook)
                    .collect::<Vec<_>>(),
            )
        });
        let (version, description, dependencies, hooks) =
            metadata.map_err(|e| PluginError::Validation {
                name: name.to_string(),
                reason: e.message,
            })?;

        let info = PluginInfo {
            name: name.to_string(),
            version,
            description,
            dependencies,
            hooks,
            enabled: false,
            registered_at: Utc::now(),
        };
        Ok(Self { plugin, info })
    }

    /// Checks the structural rules a definition must satisfy.
    pub fn validate(&self) -> Result<(), PluginError> {
        let name = &self.info.name;
        let fail = |reason: String| PluginError::Validation {
            name: name.clone(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(fail("plugin name must not be empty".to_string()));
        }
        if self.info.version.trim().is_empty() {
            return Err(fail("version is required".to_string()));
        }

        let mut seen = HashSet::new();
        for dep in &self.info.dependencies {
            if dep.trim().is_empty() {
                return Err(fail("dependency names must not be empty".to_string()));
            }
            if dep == name {
                return Err(fail("plugin cannot depend on itself".to_string()));
            }
            if !seen.insert(dep.as_str()) {
                return Err(fail(format!("dependency '{dep}' is listed more than once")));
            }
        }

        let mut hooks = HashSet::new();
        for hook in &self.info.hooks {
            if hook.as_str().trim().is_empty() {
                return Err(fail("hook names must not be empty".to_string()));
            }
            if !hooks.insert(hook) {
                return Err(fail(format!("hook '{hook}' is bound more than once")));
            }
        }

        Ok(())
    }
}

/// Outcome of the pre-enable checks.
#[derive(Debug)]
pub enum EnableCheck {
    /// The plugin is already enabled; enabling is a no-op.
    AlreadyEnabled,
    /// Dependencies are satisfied; the plugin may be initialized.
    Ready(Arc<dyn Plugin>),
}

#[derive(Debug, Default)]
struct StoreState {
    /// Plugin name → record.
    records: HashMap<String, PluginRecord>,
    /// Enabled plugin names, in enable order.
    enabled: Vec<String>,
}

impl StoreState {
    fn nodes(&self) -> Vec<DependencyNode<'_>> {
        self.records
            .values()
            .map(|record| DependencyNode {
                name: &record.info.name,
                dependencies: &record.info.dependencies,
                enabled: record.info.enabled,
            })
            .collect()
    }
}

/// Registry of all registered plugins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    state: RwLock<StoreState>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record as disabled, replacing any record of the same name.
    ///
    /// Returns whether an existing record was replaced. Callers tear down an
    /// enabled instance before replacing it.
    pub async fn insert(&self, mut record: PluginRecord) -> bool {
        let mut state = self.state.write().await;
        let name = record.info.name.clone();
        record.info.enabled = false;

        info!(plugin = %name, version = %record.info.version, "Registering plugin");

        state.enabled.retain(|enabled| enabled != &name);
        state.records.insert(name, record).is_some()
    }

    /// Removes a disabled record.
    pub async fn remove(&self, name: &str) -> Result<PluginRecord, PluginError> {
        let mut state = self.state.write().await;

        match state.records.get(name) {
            None => Err(PluginError::NotFound {
                name: name.to_string(),
            }),
            Some(record) if record.info.enabled => Err(PluginError::AlreadyEnabled {
                name: name.to_string(),
            }),
            Some(_) => state.records.remove(name).ok_or_else(|| PluginError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Runs the not-found, already-enabled and dependency checks for enable.
    pub async fn check_enable(&self, name: &str) -> Result<EnableCheck, PluginError> {
        let state = self.state.read().await;

        let record = state.records.get(name).ok_or_else(|| PluginError::NotFound {
            name: name.to_string(),
        })?;

        if state.enabled.iter().any(|enabled| enabled == name) {
            return Ok(EnableCheck::AlreadyEnabled);
        }

        if let Some(dependency) =
            dependency::first_missing_dependency(&record.info.dependencies, &state.enabled)
        {
            return Err(PluginError::DependencyNotEnabled {
                name: name.to_string(),
                dependency,
            });
        }

        Ok(EnableCheck::Ready(Arc::clone(&record.plugin)))
    }

    /// Marks a plugin enabled and appends it to the enabled set.
    pub async fn mark_enabled(&self, name: &str) -> Result<(), PluginError> {
        let mut state = self.state.write().await;

        let record = state
            .records
            .get_mut(name)
            .ok_or_else(|| PluginError::NotFound {
                name: name.to_string(),
            })?;
        record.info.enabled = true;

        if !state.enabled.iter().any(|enabled| enabled == name) {
            state.enabled.push(name.to_string());
        }
        Ok(())
    }

    /// Marks a plugin disabled and removes it from the enabled set.
    pub async fn mark_disabled(&self, name: &str) {
        let mut state = self.state.write().await;

        if let Some(record) = state.records.get_mut(name) {
            record.info.enabled = false;
        }
        state.enabled.retain(|enabled| enabled != name);
    }

    /// Gets a plugin instance by name.
    pub async fn plugin(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        let state = self.state.read().await;
        state.records.get(name).map(|record| Arc::clone(&record.plugin))
    }

    /// Gets a plugin snapshot by name.
    pub async fn get(&self, name: &str) -> Option<PluginInfo> {
        let state = self.state.read().await;
        state.records.get(name).map(|record| record.info.clone())
    }

    /// Lists plugin snapshots ordered by registration time, optionally
    /// filtered by enabled state.
    pub async fn list(&self, enabled: Option<bool>) -> Vec<PluginInfo> {
        let state = self.state.read().await;
        let mut infos: Vec<PluginInfo> = state
            .records
            .values()
            .filter(|record| enabled.is_none_or(|flag| record.info.enabled == flag))
            .map(|record| record.info.clone())
            .collect();
        infos.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        infos
    }

    /// Returns the number of registered plugins.
    pub async fn count(&self) -> usize {
        let state = self.state.read().await;
        state.records.len()
    }

    /// Checks whether a plugin is registered.
    pub async fn contains(&self, name: &str) -> bool {
        let state = self.state.read().await;
        state.records.contains_key(name)
    }

    /// Checks whether a plugin is in the enabled set.
    pub async fn is_enabled(&self, name: &str) -> bool {
        let state = self.state.read().await;
        state.enabled.iter().any(|enabled| enabled == name)
    }

    /// Enabled plugin names in enable order.
    pub async fn enabled_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.enabled.clone()
    }

    /// Registered plugins that declare `name` as a dependency.
    pub async fn dependents(&self, name: &str) -> Vec<String> {
        let state = self.state.read().await;
        dependency::dependents_of(&state.nodes(), name)
    }

    /// Enabled plugins that declare `name` as a dependency.
    pub async fn enabled_dependents(&self, name: &str) -> Vec<String> {
        let state = self.state.read().await;
        dependency::enabled_dependents_of(&state.nodes(), name)
    }

    /// Orders the requested names so dependencies are enabled first.
    pub async fn enable_order(&self, requested: &[String]) -> Result<Vec<String>, PluginError> {
        let state = self.state.read().await;
        dependency::resolve_enable_order(&state.nodes(), requested)
    }
}
