//! Hook implementations for the logging plugin.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info};

use mapsync_plugin::hooks::definitions::{DispatchOptions, HookAction, HookResult};
use mapsync_plugin::hooks::registry::HookHandler;

use crate::buffer::{LogBuffer, LogEntry, LogKind};

/// Records one hook event per call.
#[derive(Debug)]
pub struct RecordHook {
    kind: LogKind,
    buffer: Arc<LogBuffer>,
    mirror: Arc<AtomicBool>,
}

impl RecordHook {
    /// Create a handler recording `kind` entries.
    pub fn new(kind: LogKind, buffer: Arc<LogBuffer>, mirror: Arc<AtomicBool>) -> Self {
        Self {
            kind,
            buffer,
            mirror,
        }
    }

    fn message(&self, payload: &Value, options: &DispatchOptions) -> String {
        let operation = options
            .extra
            .get("operation")
            .or_else(|| payload.get("operation"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        match self.kind {
            LogKind::BeforeOperation => format!("Starting {operation}"),
            LogKind::AfterOperation => format!("Completed {operation}"),
            LogKind::Error => {
                let reason = payload
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                format!("{operation} failed: {reason}")
            }
        }
    }
}

#[async_trait]
impl HookHandler for RecordHook {
    async fn handle(&self, payload: &Value, options: &DispatchOptions) -> HookResult {
        let message = self.message(payload, options);

        if self.mirror.load(Ordering::Relaxed) {
            match self.kind {
                LogKind::Error => error!(kind = ?self.kind, "{message}"),
                _ => info!(kind = ?self.kind, "{message}"),
            }
        }

        self.buffer
            .push(LogEntry::new(self.kind, message, payload.clone()));
        Ok(HookAction::Continue)
    }
}
