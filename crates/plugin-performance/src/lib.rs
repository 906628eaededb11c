//! # Plugin Performance
//!
//! A built-in mapsync plugin that measures how long each operation takes.
//! `before-operation` starts a timer and `after-operation` stops it; the
//! running totals are read back with [`PerformancePlugin::snapshot`].

pub mod config;
pub mod hooks;
pub mod metrics;
pub mod plugin;

pub use config::PerformanceSettings;
pub use metrics::{OperationTracker, TimingSnapshot};
pub use plugin::{PLUGIN_NAME, PerformancePlugin};
