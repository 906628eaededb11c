//! Hook system: hook table, dispatcher, and hook definitions.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{DispatchMode, DispatchOptions, HookAction, HookPoint, HookResult};
pub use dispatcher::{DispatchReport, HandlerFailure, HookDispatcher};
pub use registry::{HookBinding, HookHandler, HookRegistry};
