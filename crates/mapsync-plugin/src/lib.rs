//! # mapsync-plugin
//!
//! Plugin engine for mapsync. Provides:
//!
//! - Plugin registration with structural validation
//! - Dependency-checked enable/disable with `initialize`/`cleanup` callbacks
//! - Hook table with enable-ordered bindings
//! - Hook dispatcher with chain and parallel modes
//! - Read-only engine view and typed settings for plugins
//! - Closure-built plugins via [`PluginDefinition`]

pub mod api;
pub mod dependency;
pub mod error;
pub mod exports;
pub mod hooks;
pub mod manager;
pub mod operation;
pub mod prelude;
pub mod registry;
pub mod safety;
pub mod traits;

pub use api::context::PluginContext;
pub use api::view::{EngineView, PluginStats};
pub use error::PluginError;
pub use exports::PluginDefinition;
pub use hooks::definitions::{DispatchMode, DispatchOptions, HookAction, HookPoint, HookResult};
pub use hooks::dispatcher::{DispatchReport, HookDispatcher};
pub use hooks::registry::{HookHandler, HookRegistry};
pub use manager::{EnableReport, EngineSettings, PluginManager};
pub use registry::{Plugin, PluginInfo, PluginRegistry};
