//! Handler ports: user code invoked by the dispatcher.
//!
//! Any `Fn(C, Arguments) -> impl Future<Output = HandlerResult>` closure is a
//! [`CommandHandler`], and any `Fn(C, InvocationError) -> impl Future<Output = ()>`
//! closure is an [`ErrorHandler`]. Handlers hold their own state by capture.

use crate::command::domain::{Arguments, HandlerError, InvocationError};
use async_trait::async_trait;
use std::future::Future;

/// Result type returned by command handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// A command body.
#[async_trait]
pub trait CommandHandler<C>: Send + Sync {
    /// Runs the command with the invocation context first.
    async fn invoke(&self, context: C, arguments: Arguments) -> HandlerResult;
}

#[async_trait]
impl<C, F, Fut> CommandHandler<C> for F
where
    C: Send + 'static,
    F: Fn(C, Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn invoke(&self, context: C, arguments: Arguments) -> HandlerResult {
        self(context, arguments).await
    }
}

/// Receives every failure raised by a command handler.
#[async_trait]
pub trait ErrorHandler<C>: Send + Sync {
    /// Handles `error`, raised while running a command for `context`.
    async fn on_error(&self, context: C, error: InvocationError);
}

#[async_trait]
impl<C, F, Fut> ErrorHandler<C> for F
where
    C: Send + 'static,
    F: Fn(C, InvocationError) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_error(&self, context: C, error: InvocationError) {
        self(context, error).await;
    }
}
