//! # Plugin Logging
//!
//! A built-in mapsync plugin that records `before-operation`,
//! `after-operation` and `error` events into a bounded in-memory buffer,
//! optionally mirroring each entry to `tracing`.

pub mod buffer;
pub mod config;
pub mod hooks;
pub mod plugin;

pub use buffer::{LogBuffer, LogEntry, LogKind};
pub use config::LoggingSettings;
pub use plugin::{LoggingPlugin, PLUGIN_NAME};
