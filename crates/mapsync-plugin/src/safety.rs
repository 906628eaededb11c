//! Failure isolation for plugin callbacks.
//!
//! Plugin code runs inside the engine's own task, so a panicking callback
//! would otherwise unwind through `enable`, `disable` or a dispatch. Every
//! callback is polled through [`isolate`], which turns a panic into an
//! [`AppError`] of kind `Plugin`. Synchronous metadata calls go through
//! [`isolate_sync`].

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use mapsync_core::error::AppError;
use mapsync_core::result::AppResult;

/// Polls a plugin callback, converting a panic into an error.
pub async fn isolate<F, T>(callback: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match AssertUnwindSafe(callback).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(panicked(panic.as_ref())),
    }
}

/// Runs a synchronous plugin call, converting a panic into an error.
pub fn isolate_sync<F, T>(call: F) -> AppResult<T>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(call)).map_err(|panic| panicked(panic.as_ref()))
}

fn panicked(panic: &(dyn Any + Send)) -> AppError {
    AppError::plugin(format!("plugin callback panicked: {}", panic_message(panic)))
}

/// Extracts the message from a panic payload.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
