//! Logging plugin settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings read from `plugins.settings.logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoggingSettings {
    /// Entries kept before the oldest is evicted.
    #[serde(default = "default_max_entries")]
    #[validate(range(min = 1, max = 100000))]
    pub max_entries: usize,

    /// Also emit each entry through `tracing`.
    #[serde(default = "default_true")]
    pub mirror_to_tracing: bool,
}

fn default_max_entries() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            mirror_to_tracing: true,
        }
    }
}
