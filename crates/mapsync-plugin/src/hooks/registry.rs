//! Hook registry: the hook table mapping each hook point to its ordered
//! list of plugin bindings.
//!
//! Bindings are appended in enable order and never re-sorted; that order is
//! the dispatch order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::definitions::{DispatchOptions, HookPoint, HookResult};

/// Trait for hook handler implementations.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Handles a hook invocation.
    async fn handle(&self, payload: &Value, options: &DispatchOptions) -> HookResult;
}

/// A single `(plugin, handler)` binding under a hook point.
#[derive(Debug, Clone)]
pub struct HookBinding {
    /// Plugin that owns this binding.
    pub plugin: String,
    /// The handler.
    pub handler: Arc<dyn HookHandler>,
}

/// Registry of hook bindings organized by hook point.
#[derive(Debug)]
pub struct HookRegistry {
    /// Hook point → bindings in registration order.
    bindings: RwLock<HashMap<HookPoint, Vec<HookBinding>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Appends every handler of a plugin under a single write lock.
    pub async fn register_plugin(
        &self,
        plugin: &str,
        handlers: Vec<(HookPoint, Arc<dyn HookHandler>)>,
    ) {
        let mut bindings = self.bindings.write().await;

        for (hook, handler) in handlers {
            debug!(hook = %hook, plugin = %plugin, "Hook binding registered");
            bindings.entry(hook).or_default().push(HookBinding {
                plugin: plugin.to_string(),
                handler,
            });
        }
    }

    /// Removes all bindings owned by a plugin, keeping the relative order of
    /// the remaining bindings.
    pub async fn unregister_plugin(&self, plugin: &str) -> usize {
        let mut bindings = self.bindings.write().await;
        let mut removed = 0;

        for entries in bindings.values_mut() {
            let before = entries.len();
            entries.retain(|binding| binding.plugin != plugin);
            removed += before - entries.len();
        }

        bindings.retain(|_, entries| !entries.is_empty());

        debug!(plugin = %plugin, removed, "Hook bindings unregistered");
        removed
    }

    /// Returns a snapshot of the bindings for a hook point, in dispatch order.
    pub async fn bindings(&self, hook: &HookPoint) -> Vec<HookBinding> {
        let bindings = self.bindings.read().await;
        bindings.get(hook).cloned().unwrap_or_default()
    }

    /// Returns the owning plugin names for a hook point, in dispatch order.
    pub async fn plugins_for(&self, hook: &HookPoint) -> Vec<String> {
        let bindings = self.bindings.read().await;
        bindings
            .get(hook)
            .map(|entries| entries.iter().map(|b| b.plugin.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the number of bindings for a hook point.
    pub async fn handler_count(&self, hook: &HookPoint) -> usize {
        let bindings = self.bindings.read().await;
        bindings.get(hook).map(Vec::len).unwrap_or(0)
    }

    /// Returns the total number of bindings across all hook points.
    pub async fn binding_count(&self) -> usize {
        let bindings = self.bindings.read().await;
        bindings.values().map(Vec::len).sum()
    }

    /// Returns every hook point with at least one binding, sorted by name.
    pub async fn registered_hooks(&self) -> Vec<HookPoint> {
        let bindings = self.bindings.read().await;
        let mut hooks: Vec<HookPoint> = bindings.keys().cloned().collect();
        hooks.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        hooks
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
