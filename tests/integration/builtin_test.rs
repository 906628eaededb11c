//! Integration tests for the built-in plugins driven by configuration.

use serde_json::json;

use mapsync_core::error::AppError;
use plugin_logging::LogKind;

use crate::helpers::TestEngine;

const CONFIG: &str = r#"
[plugins]
enabled = ["performance", "logging"]

[plugins.settings.performance]
slow_threshold_ms = 5000

[plugins.settings.logging]
max_entries = 4
mirror_to_tracing = false
"#;

#[tokio::test]
async fn test_configured_builtins_enable() {
    let engine = TestEngine::from_toml(CONFIG).await;
    let report = engine.enable_configured().await;

    assert_eq!(report.enabled, vec!["performance", "logging"]);
    assert!(report.failed.is_empty());

    let stats = engine.manager.stats().await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.enabled, 2);
    assert_eq!(
        stats.available_hooks,
        vec!["after-operation", "before-operation", "error"]
    );
}

#[tokio::test]
async fn test_configured_settings_reach_plugins() {
    let engine = TestEngine::from_toml(CONFIG).await;
    engine.enable_configured().await;

    assert_eq!(
        engine.performance.tracker().slow_threshold(),
        Some(std::time::Duration::from_millis(5000))
    );

    for i in 0..3 {
        engine
            .manager
            .run_operation("sync", json!({ "round": i }), |payload| async move { Ok(payload) })
            .await
            .expect("run");
    }

    // six events recorded, buffer holds the newest four
    let logs = engine.logging.logs();
    assert_eq!(logs.len(), 4);
    assert_eq!(logs[3].kind, LogKind::AfterOperation);
    assert_eq!(logs[3].data, json!({ "round": 2 }));
    assert_eq!(engine.performance.snapshot().calls, 3);
}

#[tokio::test]
async fn test_invalid_builtin_settings_reported_not_fatal() {
    let engine = TestEngine::from_toml(
        r#"
[plugins]
enabled = ["performance", "logging"]

[plugins.settings.logging]
max_entries = 0
"#,
    )
    .await;

    let report = engine.enable_configured().await;
    assert_eq!(report.enabled, vec!["performance"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].plugin, "logging");
    assert!(!engine.manager.is_enabled("logging").await);
}

#[tokio::test]
async fn test_failed_operation_recorded_by_logging_only() {
    let engine = TestEngine::from_toml(CONFIG).await;
    engine.enable_configured().await;

    let err = engine
        .manager
        .run_operation("pull", json!({ "remote": "origin" }), |_payload| async move {
            Err(AppError::internal("remote rejected"))
        })
        .await
        .unwrap_err();
    assert_eq!(err.message, "remote rejected");

    let logs = engine.logging.logs();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].kind, LogKind::Error);
    assert_eq!(logs[1].data["payload"], json!({ "remote": "origin" }));

    // the after hook never ran, so the timer is still pending
    assert_eq!(engine.performance.snapshot().calls, 0);
    assert!(engine.performance.tracker().is_pending());
}

#[tokio::test]
async fn test_disabling_builtins_unbinds_hooks() {
    let engine = TestEngine::from_toml(CONFIG).await;
    engine.enable_configured().await;

    engine.manager.disable("logging").await.expect("disable");
    engine
        .manager
        .run_operation("status", json!(null), |payload| async move { Ok(payload) })
        .await
        .expect("run");

    assert!(engine.logging.logs().is_empty());
    assert_eq!(engine.performance.snapshot().calls, 1);
    assert_eq!(engine.manager.shutdown().await, 1);
}
