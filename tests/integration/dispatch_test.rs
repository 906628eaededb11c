//! Integration tests for hook dispatch semantics.

use std::sync::{Arc, Mutex};

use serde_json::json;

use mapsync_core::config::PluginSettings;
use mapsync_core::error::AppError;
use mapsync_plugin::{DispatchOptions, HookAction, PluginDefinition, PluginError, PluginManager};

use crate::helpers::{arithmetic, as_number, enable_all, failing};

async fn add_then_double() -> PluginManager {
    let manager = PluginManager::new();
    enable_all(
        &manager,
        vec![
            ("add", arithmetic("calc", |n| n + 1)),
            ("double", arithmetic("calc", |n| n * 2)),
        ],
    )
    .await;
    manager
}

#[tokio::test]
async fn test_chain_threads_results_in_enable_order() {
    let manager = add_then_double().await;
    let result = manager
        .execute_hook("calc", json!(5), DispatchOptions::chain())
        .await
        .expect("dispatch");
    assert_eq!(as_number(&result), 12);
}

#[tokio::test]
async fn test_parallel_returns_original_payload() {
    let manager = add_then_double().await;
    let report = manager
        .dispatch_report("calc", json!(5), DispatchOptions::parallel())
        .await
        .expect("dispatch");
    assert_eq!(as_number(&report.value), 5);
    assert_eq!(report.invoked, vec!["add", "double"]);
}

#[tokio::test]
async fn test_unbound_hook_returns_payload() {
    let manager = PluginManager::new();
    let result = manager
        .execute_hook("nobody-listens", json!({"a": 1}), DispatchOptions::default())
        .await
        .expect("dispatch");
    assert_eq!(result, json!({"a": 1}));
}

#[tokio::test]
async fn test_failure_is_skipped_without_stop_on_error() {
    let manager = PluginManager::new();
    enable_all(
        &manager,
        vec![
            ("add", arithmetic("calc", |n| n + 1)),
            ("broken", failing("calc")),
            ("double", arithmetic("calc", |n| n * 2)),
        ],
    )
    .await;

    let report = manager
        .dispatch_report("calc", json!(5), DispatchOptions::chain())
        .await
        .expect("dispatch");

    assert_eq!(as_number(&report.value), 12);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].plugin, "broken");
    assert!(report.failures[0].error.contains("handler exploded"));
}

#[tokio::test]
async fn test_stop_on_error_propagates_and_halts() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let after = PluginDefinition::builder("1.0.0")
        .on_sync("calc", move |_payload, _options| {
            *counter.lock().expect("lock") += 1;
            Ok(HookAction::Continue)
        })
        .into_plugin();

    let manager = PluginManager::new();
    enable_all(&manager, vec![("broken", failing("calc")), ("after", after)]).await;

    let err = manager
        .execute_hook("calc", json!(5), DispatchOptions::chain().stop_on_error(true))
        .await
        .unwrap_err();

    match err {
        PluginError::Handler { hook, plugin, .. } => {
            assert_eq!(hook, "calc");
            assert_eq!(plugin, "broken");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*calls.lock().expect("lock"), 0);
}

#[tokio::test]
async fn test_panicking_handler_is_contained() {
    let panicking = PluginDefinition::builder("1.0.0")
        .on_sync("calc", |payload, _options| {
            if payload.is_number() {
                panic!("handler panicked");
            }
            Ok(HookAction::Continue)
        })
        .into_plugin();

    let manager = PluginManager::new();
    enable_all(
        &manager,
        vec![("panics", panicking), ("add", arithmetic("calc", |n| n + 1))],
    )
    .await;

    let report = manager
        .dispatch_report("calc", json!(1), DispatchOptions::chain())
        .await
        .expect("dispatch");
    assert_eq!(as_number(&report.value), 2);
    assert!(report.failures[0].error.contains("handler panicked"));
}

#[tokio::test]
async fn test_plugin_disabled_mid_dispatch_is_skipped() {
    let manager = Arc::new(PluginManager::new());

    let handle = Arc::clone(&manager);
    let disabler = PluginDefinition::builder("1.0.0")
        .on_async("calc", move |_payload, _options| {
            let manager = Arc::clone(&handle);
            async move {
                manager.disable("double").await.map_err(AppError::from)?;
                Ok::<_, AppError>(HookAction::Continue)
            }
        })
        .into_plugin();

    enable_all(
        &manager,
        vec![("disabler", disabler), ("double", arithmetic("calc", |n| n * 2))],
    )
    .await;

    let report = manager
        .dispatch_report("calc", json!(5), DispatchOptions::chain())
        .await
        .expect("dispatch");

    assert_eq!(as_number(&report.value), 5);
    assert_eq!(report.skipped, vec!["double"]);
    assert!(!manager.is_enabled("double").await);
}

#[tokio::test]
async fn test_extra_options_reach_handlers() {
    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let plugin = PluginDefinition::builder("1.0.0")
        .on_sync("inspect", move |_payload, options| {
            *sink.lock().expect("lock") = options.extra.get("dryRun").cloned();
            Ok(HookAction::Continue)
        })
        .into_plugin();

    let manager = PluginManager::new();
    manager.register("inspect", plugin).await.expect("register");
    manager.enable("inspect", PluginSettings::new()).await.expect("enable");

    let options: DispatchOptions =
        serde_json::from_value(json!({"type": "parallel", "dryRun": true})).expect("options");
    manager
        .execute_hook("inspect", json!(null), options)
        .await
        .expect("dispatch");

    assert_eq!(*seen.lock().expect("lock"), Some(json!(true)));
}
