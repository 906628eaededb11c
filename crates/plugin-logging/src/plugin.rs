//! Logging plugin implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::info;

use mapsync_core::result::AppResult;
use mapsync_plugin::api::context::PluginContext;
use mapsync_plugin::hooks::definitions::HookPoint;
use mapsync_plugin::hooks::registry::HookHandler;
use mapsync_plugin::registry::Plugin;

use crate::buffer::{LogBuffer, LogEntry, LogKind};
use crate::config::LoggingSettings;
use crate::hooks::RecordHook;

/// Name the plugin is registered under.
pub const PLUGIN_NAME: &str = "logging";

/// Records operation lifecycle events in memory.
#[derive(Debug)]
pub struct LoggingPlugin {
    buffer: Arc<LogBuffer>,
    mirror: Arc<AtomicBool>,
}

impl LoggingPlugin {
    /// Create a new logging plugin with default settings.
    pub fn new() -> Self {
        let defaults = LoggingSettings::default();
        Self {
            buffer: Arc::new(LogBuffer::new(defaults.max_entries)),
            mirror: Arc::new(AtomicBool::new(defaults.mirror_to_tracing)),
        }
    }

    /// Copy of the recorded entries, oldest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.buffer.entries()
    }

    /// Remove all recorded entries.
    pub fn clear_logs(&self) {
        self.buffer.clear();
    }

    fn handler(&self, kind: LogKind) -> Arc<dyn HookHandler> {
        Arc::new(RecordHook::new(
            kind,
            Arc::clone(&self.buffer),
            Arc::clone(&self.mirror),
        ))
    }
}

impl Default for LoggingPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for LoggingPlugin {
    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "Records operation lifecycle events"
    }

    fn hooks(&self) -> Vec<(HookPoint, Arc<dyn HookHandler>)> {
        vec![
            (HookPoint::BeforeOperation, self.handler(LogKind::BeforeOperation)),
            (HookPoint::AfterOperation, self.handler(LogKind::AfterOperation)),
            (HookPoint::Error, self.handler(LogKind::Error)),
        ]
    }

    async fn initialize(&self, ctx: &PluginContext) -> AppResult<()> {
        let settings: LoggingSettings = ctx.validated_settings()?;
        self.buffer.set_capacity(settings.max_entries);
        self.mirror
            .store(settings.mirror_to_tracing, Ordering::Relaxed);

        info!(
            plugin = %ctx.plugin_name,
            max_entries = settings.max_entries,
            mirror_to_tracing = settings.mirror_to_tracing,
            "Logging plugin initialized"
        );
        Ok(())
    }
}
