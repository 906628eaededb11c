//! Runs one operation through the `before-operation`, `after-operation` and
//! `error` hooks.

use std::future::Future;

use serde_json::{Value, json};
use tracing::debug;

use mapsync_core::result::AppResult;

use crate::hooks::definitions::{DispatchOptions, HookPoint};
use crate::manager::PluginManager;

impl PluginManager {
    /// Runs `op` between the operation hooks.
    ///
    /// `before-operation` (chain) prepares the payload passed to `op`;
    /// `after-operation` (chain) transforms its output. If `op` fails, `error`
    /// is dispatched in parallel mode with `{ operation, error, payload }`
    /// and the original error is returned.
    pub async fn run_operation<F, Fut>(
        &self,
        operation: &str,
        payload: Value,
        op: F,
    ) -> AppResult<Value>
    where
        F: FnOnce(Value) -> Fut,
        Fut: Future<Output = AppResult<Value>>,
    {
        let options = DispatchOptions::chain().with("operation", json!(operation));

        let prepared = self
            .execute_hook(HookPoint::BeforeOperation, payload, options.clone())
            .await?;

        match op(prepared.clone()).await {
            Ok(output) => {
                let output = self
                    .execute_hook(HookPoint::AfterOperation, output, options)
                    .await?;
                debug!(operation = %operation, "Operation completed");
                Ok(output)
            }
            Err(e) => {
                let report = json!({
                    "operation": operation,
                    "error": e.to_string(),
                    "payload": prepared,
                });
                let error_options = DispatchOptions::parallel().with("operation", json!(operation));
                if let Err(hook_error) = self
                    .execute_hook(HookPoint::Error, report, error_options)
                    .await
                {
                    debug!(operation = %operation, error = %hook_error, "Error hook failed");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mapsync_core::config::PluginSettings;
    use mapsync_core::error::AppError;

    use super::*;
    use crate::exports::PluginDefinition;
    use crate::hooks::definitions::HookAction;

    #[tokio::test]
    async fn test_run_operation_passes_through_hooks() {
        let manager = PluginManager::new();
        let plugin = PluginDefinition::builder("1.0.0")
            .on_sync(HookPoint::BeforeOperation, |payload, options| {
                assert_eq!(options.extra.get("operation"), Some(&json!("push")));
                Ok(HookAction::ContinueWith(json!({ "prepared": payload })))
            })
            .on_sync(HookPoint::AfterOperation, |payload, _options| {
                Ok(HookAction::ContinueWith(json!({ "after": payload })))
            })
            .into_plugin();
        manager.register("wrap", plugin).await.expect("register");
        manager.enable("wrap", PluginSettings::new()).await.expect("enable");

        let output = manager
            .run_operation("push", json!(1), |prepared| async move {
                assert_eq!(prepared, json!({ "prepared": 1 }));
                Ok(json!("done"))
            })
            .await
            .expect("run");

        assert_eq!(output, json!({ "after": "done" }));
    }

    #[tokio::test]
    async fn test_run_operation_failure_fires_error_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let manager = PluginManager::new();
        let plugin = PluginDefinition::builder("1.0.0")
            .on_sync(HookPoint::Error, move |payload, _options| {
                sink.lock().expect("lock").push(payload.clone());
                Ok(HookAction::ContinueWith(json!("ignored")))
            })
            .into_plugin();
        manager.register("watch", plugin).await.expect("register");
        manager.enable("watch", PluginSettings::new()).await.expect("enable");

        let err = manager
            .run_operation("pull", json!({"repo": "a"}), |_prepared| async move {
                Err(AppError::internal("remote unreachable"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.message, "remote unreachable");
        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["operation"], "pull");
        assert_eq!(seen[0]["payload"], json!({"repo": "a"}));
        assert!(seen[0]["error"].as_str().unwrap_or_default().contains("remote unreachable"));
    }
}
