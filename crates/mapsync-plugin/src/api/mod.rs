//! Plugin API: what plugin code can see of the engine.

pub mod context;
pub mod view;

pub use context::PluginContext;
pub use view::{EngineView, PluginStats};
