//! Performance plugin settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings read from `plugins.settings.performance`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PerformanceSettings {
    /// Operations slower than this many milliseconds are logged as warnings.
    #[validate(range(min = 1))]
    pub slow_threshold_ms: Option<u64>,
}
