//! Closure-assembled plugin definitions.
//!
//! [`PluginDefinition`] is the quick way to build a plugin without a
//! dedicated type: set a version, optional dependencies, hook handlers and
//! lifecycle callbacks, then register the result like any other plugin.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use mapsync_core::result::AppResult;

use crate::api::context::PluginContext;
use crate::hooks::definitions::{DispatchOptions, HookPoint, HookResult};
use crate::hooks::registry::HookHandler;
use crate::registry::Plugin;
use crate::traits::ClosureHandler;

type InitializeFn = Arc<dyn Fn(PluginContext) -> BoxFuture<'static, AppResult<()>> + Send + Sync>;
type CleanupFn = Arc<dyn Fn() -> BoxFuture<'static, AppResult<()>> + Send + Sync>;

/// A plugin assembled from parts.
#[derive(Clone)]
pub struct PluginDefinition {
    version: String,
    description: String,
    dependencies: Vec<String>,
    handlers: Vec<(HookPoint, Arc<dyn HookHandler>)>,
    initialize: Option<InitializeFn>,
    cleanup: Option<CleanupFn>,
}

impl std::fmt::Debug for PluginDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("version", &self.version)
            .field("dependencies", &self.dependencies)
            .field(
                "hooks",
                &self.handlers.iter().map(|(hook, _)| hook.as_str()).collect::<Vec<_>>(),
            )
            .field("initialize", &self.initialize.is_some())
            .field("cleanup", &self.cleanup.is_some())
            .finish()
    }
}

impl PluginDefinition {
    /// Starts building a definition with the given version.
    pub fn builder(version: &str) -> PluginDefinitionBuilder {
        PluginDefinitionBuilder::new(version)
    }

    /// Wraps the definition into an `Arc<dyn Plugin>`.
    pub fn into_plugin(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }
}

#[async_trait]
impl Plugin for PluginDefinition {
    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn hooks(&self) -> Vec<(HookPoint, Arc<dyn HookHandler>)> {
        self.handlers.clone()
    }

    async fn initialize(&self, ctx: &PluginContext) -> AppResult<()> {
        match &self.initialize {
            Some(initialize) => initialize(ctx.clone()).await,
            None => Ok(()),
        }
    }

    async fn cleanup(&self) -> AppResult<()> {
        match &self.cleanup {
            Some(cleanup) => cleanup().await,
            None => Ok(()),
        }
    }
}

/// Builder for [`PluginDefinition`].
#[derive(Debug)]
pub struct PluginDefinitionBuilder {
    definition: PluginDefinition,
}

impl PluginDefinitionBuilder {
    /// Creates a new builder.
    pub fn new(version: &str) -> Self {
        Self {
            definition: PluginDefinition {
                version: version.to_string(),
                description: String::new(),
                dependencies: Vec::new(),
                handlers: Vec::new(),
                initialize: None,
                cleanup: None,
            },
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.definition.description = description.to_string();
        self
    }

    /// Declares a dependency.
    pub fn depends_on(mut self, plugin: &str) -> Self {
        self.definition.dependencies.push(plugin.to_string());
        self
    }

    /// Binds a handler to a hook point.
    pub fn on(mut self, hook: impl Into<HookPoint>, handler: Arc<dyn HookHandler>) -> Self {
        self.definition.handlers.push((hook.into(), handler));
        self
    }

    /// Binds an async closure to a hook point.
    pub fn on_async<F, Fut>(self, hook: impl Into<HookPoint>, handler: F) -> Self
    where
        F: Fn(Value, DispatchOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        let hook = hook.into();
        let handler = ClosureHandler::new(hook.as_str(), handler).into_handler();
        self.on(hook, handler)
    }

    /// Binds a synchronous closure to a hook point.
    pub fn on_sync<F>(self, hook: impl Into<HookPoint>, handler: F) -> Self
    where
        F: Fn(&Value, &DispatchOptions) -> HookResult + Send + Sync + 'static,
    {
        let hook = hook.into();
        let handler = ClosureHandler::sync(hook.as_str(), handler).into_handler();
        self.on(hook, handler)
    }

    /// Sets the initialize callback.
    pub fn on_initialize<F, Fut>(mut self, initialize: F) -> Self
    where
        F: Fn(PluginContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.definition.initialize = Some(Arc::new(
            move |ctx: PluginContext| -> BoxFuture<'static, AppResult<()>> {
                Box::pin(initialize(ctx))
            },
        ));
        self
    }

    /// Sets the cleanup callback.
    pub fn on_cleanup<F, Fut>(mut self, cleanup: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.definition.cleanup = Some(Arc::new(move || -> BoxFuture<'static, AppResult<()>> {
            Box::pin(cleanup())
        }));
        self
    }

    /// Builds the definition as an `Arc<dyn Plugin>`.
    pub fn into_plugin(self) -> Arc<dyn Plugin> {
        self.definition.into_plugin()
    }
}
