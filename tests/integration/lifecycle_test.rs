//! Integration tests for plugin lifecycle and dependency rules.

use std::collections::HashMap;

use mapsync_core::config::PluginSettings;
use mapsync_plugin::{EngineSettings, HookPoint, PluginError, PluginManager};

use crate::helpers::{arithmetic, enable_all, with_dependencies};

#[tokio::test]
async fn test_dependency_chain_enable_and_disable_order() {
    let manager = PluginManager::new();
    manager.register("storage", with_dependencies("x", &[])).await.expect("register");
    manager.register("git", with_dependencies("x", &["storage"])).await.expect("register");
    manager
        .register("mapper", with_dependencies("x", &["storage", "git"]))
        .await
        .expect("register");

    // mapper needs both; the first missing one in declaration order is named
    let err = manager.enable("mapper", PluginSettings::new()).await.unwrap_err();
    assert!(matches!(
        err,
        PluginError::DependencyNotEnabled { ref dependency, .. } if dependency == "storage"
    ));

    manager.enable("storage", PluginSettings::new()).await.expect("enable storage");
    let err = manager.enable("mapper", PluginSettings::new()).await.unwrap_err();
    assert!(matches!(
        err,
        PluginError::DependencyNotEnabled { ref dependency, .. } if dependency == "git"
    ));

    manager.enable("git", PluginSettings::new()).await.expect("enable git");
    manager.enable("mapper", PluginSettings::new()).await.expect("enable mapper");

    let err = manager.disable("storage").await.unwrap_err();
    match err {
        PluginError::HasDependents { dependents, .. } => {
            assert_eq!(dependents, vec!["git", "mapper"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err_message_names_dependents(&manager).await);

    assert_eq!(manager.shutdown().await, 3);
    assert_eq!(manager.stats().await.hooks, 0);
}

async fn err_message_names_dependents(manager: &PluginManager) -> bool {
    match manager.disable("git").await {
        Err(e) => e.to_string().contains("mapper"),
        Ok(()) => false,
    }
}

#[tokio::test]
async fn test_reenable_moves_bindings_to_end() {
    let manager = PluginManager::new();
    enable_all(
        &manager,
        vec![
            ("first", arithmetic("calc", |n| n + 1)),
            ("second", arithmetic("calc", |n| n * 2)),
        ],
    )
    .await;

    let view = manager.view();
    let hook = HookPoint::custom("calc");
    assert_eq!(view.bindings_for(&hook).await, vec!["first", "second"]);

    manager.disable("first").await.expect("disable");
    manager.enable("first", PluginSettings::new()).await.expect("re-enable");
    assert_eq!(view.bindings_for(&hook).await, vec!["second", "first"]);
    assert_eq!(manager.stats().await.enabled_plugins, vec!["second", "first"]);
}

#[tokio::test]
async fn test_invalid_definitions_rejected_only_with_validation() {
    let manager = PluginManager::new();

    let self_dependent = with_dependencies("x", &["loop"]);
    let err = manager.register("loop", self_dependent).await.unwrap_err();
    assert!(matches!(err, PluginError::Validation { .. }));

    let duplicate = with_dependencies("x", &["a", "a"]);
    assert!(manager.register("dup", duplicate).await.is_err());

    assert!(manager.register("", with_dependencies("x", &[])).await.is_err());
    assert_eq!(manager.stats().await.total, 0);

    let lenient = PluginManager::with_settings(EngineSettings {
        validate: false,
        plugin_config: HashMap::new(),
    });
    lenient
        .register("loop", with_dependencies("x", &["loop"]))
        .await
        .expect("self dependency accepted");
    lenient
        .register("dup", with_dependencies("x", &["a", "a"]))
        .await
        .expect("duplicate dependency accepted");
    lenient.register("", with_dependencies("x", &[])).await.expect("empty name accepted");
    assert_eq!(lenient.stats().await.total, 3);
    assert_eq!(
        lenient.get_plugin("dup").await.expect("info").dependencies,
        vec!["a", "a"]
    );
}

#[tokio::test]
async fn test_enable_configured_reports_cycle_members() {
    let manager = PluginManager::new();
    manager.register("a", with_dependencies("x", &["b"])).await.expect("register");
    manager.register("b", with_dependencies("x", &["a"])).await.expect("register");
    manager.register("c", with_dependencies("x", &[])).await.expect("register");

    let report = manager
        .enable_configured(&["a".to_string(), "b".to_string(), "c".to_string()])
        .await;

    assert_eq!(report.enabled, vec!["c"]);
    let failed: Vec<&str> = report.failed.iter().map(|f| f.plugin.as_str()).collect();
    assert_eq!(failed, vec!["a", "b"]);
}

#[tokio::test]
async fn test_plugin_info_snapshot() {
    let manager = PluginManager::new();
    manager.register("base", with_dependencies("x", &[])).await.expect("register");
    manager
        .register("child", with_dependencies("before-operation", &["base"]))
        .await
        .expect("register");

    let info = manager.get_plugin("child").await.expect("info");
    assert_eq!(info.name, "child");
    assert_eq!(info.version, "1.0.0");
    assert_eq!(info.dependencies, vec!["base"]);
    assert_eq!(info.hooks, vec![HookPoint::BeforeOperation]);
    assert!(!info.enabled);

    let listed: Vec<String> = manager
        .list_plugins(Some(false))
        .await
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(listed, vec!["base", "child"]);
    assert!(manager.list_plugins(Some(true)).await.is_empty());
    assert!(manager.get_plugin("ghost").await.is_none());
}
