//! Hook implementations for the performance plugin.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use mapsync_plugin::hooks::definitions::{DispatchOptions, HookAction, HookResult};
use mapsync_plugin::hooks::registry::HookHandler;

use crate::metrics::OperationTracker;

/// Reads the operation name forwarded in the dispatch options.
fn operation_name(options: &DispatchOptions) -> &str {
    options
        .extra
        .get("operation")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// Hook handler for before-operation: start the timer.
#[derive(Debug)]
pub struct StartTimerHook {
    tracker: Arc<OperationTracker>,
}

impl StartTimerHook {
    /// Create a new before-operation handler.
    pub fn new(tracker: Arc<OperationTracker>) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl HookHandler for StartTimerHook {
    async fn handle(&self, _payload: &Value, _options: &DispatchOptions) -> HookResult {
        self.tracker.start();
        Ok(HookAction::Continue)
    }
}

/// Hook handler for after-operation: stop the timer and record the duration.
#[derive(Debug)]
pub struct StopTimerHook {
    tracker: Arc<OperationTracker>,
}

impl StopTimerHook {
    /// Create a new after-operation handler.
    pub fn new(tracker: Arc<OperationTracker>) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl HookHandler for StopTimerHook {
    async fn handle(&self, _payload: &Value, options: &DispatchOptions) -> HookResult {
        let operation = operation_name(options);

        let Some(elapsed) = self.tracker.finish() else {
            debug!(operation = %operation, "after-operation without a started timer");
            return Ok(HookAction::Continue);
        };

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        match self.tracker.slow_threshold() {
            Some(threshold) if elapsed > threshold => warn!(
                operation = %operation,
                elapsed_ms,
                threshold_ms = threshold.as_millis() as u64,
                "Slow operation"
            ),
            _ => debug!(operation = %operation, elapsed_ms, "Operation timed"),
        }

        Ok(HookAction::Continue)
    }
}
