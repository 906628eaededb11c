//! Hook dispatcher: runs every binding of a hook point in order.
//!
//! Chain mode:
//! - Each handler receives the current result.
//! - `ContinueWith` replaces the result, `Continue` leaves it unchanged.
//!
//! Parallel mode:
//! - Each handler receives the original payload.
//! - Handler outputs are discarded; the original payload is returned.
//!
//! Handlers are always awaited one at a time. A failing handler is logged
//! and skipped unless the caller asked for `stop_on_error`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::PluginError;
use crate::registry::PluginRegistry;
use crate::safety::isolate;

use super::definitions::{DispatchOptions, HookAction, HookPoint};
use super::registry::HookRegistry;

/// A handler failure recorded during a dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerFailure {
    /// Plugin owning the failed binding.
    pub plugin: String,
    /// Failure message.
    pub error: String,
}

/// Aggregated result of dispatching a hook to all bindings.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    /// The hook that was dispatched.
    pub hook: HookPoint,
    /// Final payload.
    pub value: Value,
    /// Plugins whose handler ran, in order (including failed ones).
    pub invoked: Vec<String>,
    /// Plugins skipped because they were no longer enabled.
    pub skipped: Vec<String>,
    /// Handler failures that did not stop the dispatch.
    pub failures: Vec<HandlerFailure>,
}

/// Dispatches hooks to registered bindings.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook table.
    hooks: Arc<HookRegistry>,
    /// Plugin store, consulted for the enabled set.
    plugins: Arc<PluginRegistry>,
}

impl HookDispatcher {
    /// Creates a new hook dispatcher.
    pub fn new(hooks: Arc<HookRegistry>, plugins: Arc<PluginRegistry>) -> Self {
        Self { hooks, plugins }
    }

    /// Dispatches a hook and returns the resulting payload.
    pub async fn dispatch(
        &self,
        hook: &HookPoint,
        payload: Value,
        options: &DispatchOptions,
    ) -> Result<Value, PluginError> {
        self.dispatch_report(hook, payload, options)
            .await
            .map(|report| report.value)
    }

    /// Dispatches a hook and returns the full report.
    ///
    /// Returns `Err` only when a handler fails and `options.stop_on_error`
    /// is set; later bindings do not run in that case.
    pub async fn dispatch_report(
        &self,
        hook: &HookPoint,
        payload: Value,
        options: &DispatchOptions,
    ) -> Result<DispatchReport, PluginError> {
        let bindings = self.hooks.bindings(hook).await;
        let parallel = options.is_parallel();

        let mut report = DispatchReport {
            hook: hook.clone(),
            value: payload,
            invoked: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        };

        if bindings.is_empty() {
            return Ok(report);
        }

        debug!(
            hook = %hook,
            handler_count = bindings.len(),
            mode = ?options.mode,
            "Dispatching hook"
        );

        for binding in &bindings {
            // Bindings are snapshotted before the loop; a plugin disabled by an
            // earlier handler must not run.
            if !self.plugins.is_enabled(&binding.plugin).await {
                debug!(hook = %hook, plugin = %binding.plugin, "Skipping disabled plugin");
                report.skipped.push(binding.plugin.clone());
                continue;
            }

            report.invoked.push(binding.plugin.clone());

            let outcome = isolate(binding.handler.handle(&report.value, options)).await;

            match outcome {
                Ok(HookAction::ContinueWith(value)) if !parallel => {
                    report.value = value;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        hook = %hook,
                        plugin = %binding.plugin,
                        error = %e,
                        "Hook handler failed"
                    );

                    if options.stop_on_error {
                        return Err(PluginError::Handler {
                            hook: hook.to_string(),
                            plugin: binding.plugin.clone(),
                            source: e,
                        });
                    }

                    report.failures.push(HandlerFailure {
                        plugin: binding.plugin.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
