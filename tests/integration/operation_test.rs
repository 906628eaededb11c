//! Integration tests for running operations alongside user plugins.

use std::sync::Arc;

use serde_json::json;

use mapsync_core::config::PluginSettings;
use mapsync_plugin::{HookAction, HookPoint, PluginDefinition};

use crate::helpers::TestEngine;

#[tokio::test]
async fn test_user_plugin_transforms_operation_payloads() {
    let engine = TestEngine::from_toml("[plugins]\nenabled = [\"performance\"]\n").await;
    engine.enable_configured().await;

    let mapper = PluginDefinition::builder("2.1.0")
        .description("Rewrites source paths")
        .depends_on("performance")
        .on_sync(HookPoint::BeforeOperation, |payload, _options| {
            let mut payload = payload.clone();
            let mapped = payload
                .get("path")
                .and_then(|p| p.as_str())
                .map(|path| format!("mapped/{path}"));
            if let Some(mapped) = mapped {
                payload["path"] = json!(mapped);
            }
            Ok(HookAction::ContinueWith(payload))
        })
        .on_sync(HookPoint::AfterOperation, |payload, _options| {
            Ok(HookAction::ContinueWith(json!({ "result": payload, "mapped": true })))
        })
        .into_plugin();
    engine.manager.register("mapper", mapper).await.expect("register");
    engine
        .manager
        .enable("mapper", PluginSettings::new())
        .await
        .expect("enable");

    let output = engine
        .manager
        .run_operation("copy", json!({ "path": "docs/readme.md" }), |prepared| async move {
            Ok(prepared["path"].clone())
        })
        .await
        .expect("run");

    assert_eq!(output, json!({ "result": "mapped/docs/readme.md", "mapped": true }));
    assert_eq!(engine.performance.snapshot().calls, 1);

    // performance cannot go while mapper depends on it
    assert!(engine.manager.disable("performance").await.is_err());
}

#[tokio::test]
async fn test_operation_without_plugins_is_passthrough() {
    let engine = TestEngine::from_toml("[plugins]\nenabled = []\n").await;
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let output = engine
        .manager
        .run_operation("noop", json!([1, 2, 3]), move |prepared| async move {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(prepared)
        })
        .await
        .expect("run");

    assert_eq!(output, json!([1, 2, 3]));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}
