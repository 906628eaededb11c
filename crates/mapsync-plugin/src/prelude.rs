//! Prelude for plugin authors.

pub use async_trait::async_trait;

pub use mapsync_core::config::PluginSettings;
pub use mapsync_core::error::AppError;
pub use mapsync_core::result::AppResult;

pub use crate::api::context::PluginContext;
pub use crate::api::view::EngineView;
pub use crate::error::PluginError;
pub use crate::exports::PluginDefinition;
pub use crate::hooks::definitions::{DispatchOptions, HookAction, HookPoint, HookResult};
pub use crate::hooks::registry::HookHandler;
pub use crate::registry::{Plugin, PluginInfo};
pub use crate::traits::ClosureHandler;
