//! Performance plugin implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use mapsync_core::result::AppResult;
use mapsync_plugin::api::context::PluginContext;
use mapsync_plugin::hooks::definitions::HookPoint;
use mapsync_plugin::hooks::registry::HookHandler;
use mapsync_plugin::registry::Plugin;

use crate::config::PerformanceSettings;
use crate::hooks::{StartTimerHook, StopTimerHook};
use crate::metrics::{OperationTracker, TimingSnapshot};

/// Name the plugin is registered under.
pub const PLUGIN_NAME: &str = "performance";

/// Times operations between `before-operation` and `after-operation`.
#[derive(Debug, Default)]
pub struct PerformancePlugin {
    tracker: Arc<OperationTracker>,
}

impl PerformancePlugin {
    /// Create a new performance plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared tracker.
    pub fn tracker(&self) -> &Arc<OperationTracker> {
        &self.tracker
    }

    /// Current timings.
    pub fn snapshot(&self) -> TimingSnapshot {
        self.tracker.snapshot()
    }

    /// Clear recorded timings.
    pub fn reset(&self) {
        self.tracker.reset();
    }
}

#[async_trait]
impl Plugin for PerformancePlugin {
    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "Measures operation durations"
    }

    fn hooks(&self) -> Vec<(HookPoint, Arc<dyn HookHandler>)> {
        vec![
            (
                HookPoint::BeforeOperation,
                Arc::new(StartTimerHook::new(Arc::clone(&self.tracker))),
            ),
            (
                HookPoint::AfterOperation,
                Arc::new(StopTimerHook::new(Arc::clone(&self.tracker))),
            ),
        ]
    }

    async fn initialize(&self, ctx: &PluginContext) -> AppResult<()> {
        let settings: PerformanceSettings = ctx.validated_settings()?;
        self.tracker
            .set_slow_threshold(settings.slow_threshold_ms.map(Duration::from_millis));

        info!(
            plugin = %ctx.plugin_name,
            slow_threshold_ms = ?settings.slow_threshold_ms,
            "Performance plugin initialized"
        );
        Ok(())
    }

    async fn cleanup(&self) -> AppResult<()> {
        self.tracker.clear_pending();
        Ok(())
    }
}
