//! Hook point names, dispatch options and handler results.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mapsync_core::error::AppError;

/// A named extension point in the sync pipeline.
///
/// The pipeline fires the well-known points; any other name is carried as
/// [`HookPoint::Custom`] so plugins can define their own extension points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HookPoint {
    /// Fired before a sync operation performs its I/O. Chain handlers may
    /// rewrite the operation payload.
    BeforeOperation,
    /// Fired after a sync operation completes, with the operation output.
    AfterOperation,
    /// Fired when a sync operation fails.
    Error,
    /// Any other hook name.
    Custom(String),
}

impl HookPoint {
    /// Returns the string name of this hook point.
    pub fn as_str(&self) -> &str {
        match self {
            Self::BeforeOperation => "before-operation",
            Self::AfterOperation => "after-operation",
            Self::Error => "error",
            Self::Custom(name) => name,
        }
    }

    /// Creates a custom hook point.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for HookPoint {
    fn from(name: &str) -> Self {
        match name {
            "before-operation" => Self::BeforeOperation,
            "after-operation" => Self::AfterOperation,
            "error" => Self::Error,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for HookPoint {
    fn from(name: String) -> Self {
        match name.as_str() {
            "before-operation" | "after-operation" | "error" => Self::from(name.as_str()),
            _ => Self::Custom(name),
        }
    }
}

impl From<HookPoint> for String {
    fn from(hook: HookPoint) -> Self {
        match hook {
            HookPoint::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// How the dispatcher threads the payload through bound handlers.
///
/// Only `"parallel"` selects parallel mode; any other `type` value means chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Value")]
pub enum DispatchMode {
    /// Each handler receives the previous handler's output.
    #[default]
    Chain,
    /// Every handler observes the original payload; outputs are discarded.
    Parallel,
}

impl From<Value> for DispatchMode {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("parallel") => Self::Parallel,
            _ => Self::Chain,
        }
    }
}

/// Options for a single hook dispatch. Handlers receive them unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchOptions {
    /// Payload threading mode.
    #[serde(default, rename = "type")]
    pub mode: DispatchMode,
    /// Abort the dispatch and return the first handler failure.
    #[serde(default, rename = "stopOnError")]
    pub stop_on_error: bool,
    /// Caller-defined keys forwarded to handlers.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl DispatchOptions {
    /// Chain-mode options (the default).
    pub fn chain() -> Self {
        Self::default()
    }

    /// Parallel-mode options.
    pub fn parallel() -> Self {
        Self {
            mode: DispatchMode::Parallel,
            ..Self::default()
        }
    }

    /// Sets the stop-on-error flag.
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    /// Adds a caller-defined option.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Returns whether this dispatch runs in parallel mode.
    pub fn is_parallel(&self) -> bool {
        self.mode == DispatchMode::Parallel
    }
}

/// What a handler wants the dispatcher to do with the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookAction {
    /// Leave the payload unchanged.
    Continue,
    /// Replace the payload with this value (chain mode only).
    ContinueWith(Value),
}

/// Result returned from a hook handler invocation.
pub type HookResult = Result<HookAction, AppError>;
