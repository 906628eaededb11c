//! Closure-based hook handlers for quick handler creation.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::hooks::definitions::{DispatchOptions, HookResult};
use crate::hooks::registry::HookHandler;

type HandlerFn =
    Arc<dyn Fn(Value, DispatchOptions) -> BoxFuture<'static, HookResult> + Send + Sync>;

/// A hook handler backed by a closure.
///
/// The closure receives owned copies of the payload and options so the
/// returned future can be `'static`.
#[derive(Clone)]
pub struct ClosureHandler {
    /// Label used in debug output.
    label: String,
    /// Handler function.
    handler: HandlerFn,
}

impl std::fmt::Debug for ClosureHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureHandler")
            .field("label", &self.label)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl ClosureHandler {
    /// Creates a handler from an async closure.
    pub fn new<F, Fut>(label: &str, handler: F) -> Self
    where
        F: Fn(Value, DispatchOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        Self {
            label: label.to_string(),
            handler: Arc::new(
                move |payload: Value, options: DispatchOptions| -> BoxFuture<'static, HookResult> {
                    Box::pin(handler(payload, options))
                },
            ),
        }
    }

    /// Creates a handler from a synchronous closure.
    pub fn sync<F>(label: &str, handler: F) -> Self
    where
        F: Fn(&Value, &DispatchOptions) -> HookResult + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Self::new(label, move |payload, options| {
            let handler = Arc::clone(&handler);
            async move { handler(&payload, &options) }
        })
    }

    /// Wraps the handler into an `Arc<dyn HookHandler>`.
    pub fn into_handler(self) -> Arc<dyn HookHandler> {
        Arc::new(self)
    }
}

#[async_trait]
impl HookHandler for ClosureHandler {
    async fn handle(&self, payload: &Value, options: &DispatchOptions) -> HookResult {
        (self.handler)(payload.clone(), options.clone()).await
    }
}
