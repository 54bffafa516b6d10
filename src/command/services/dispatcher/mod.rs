//! Routes inbound interactions to command handlers.
//!
//! The dispatcher reads a frozen tree and holds no lock, so any number of
//! dispatches may run concurrently. Each handler runs in its own task; a
//! failure or panic there is reified as an [`InvocationError`] and never
//! escapes further.

mod coercion;

use crate::command::domain::{
    Arguments, Command, CommandTree, DispatchError, HandlerPanicked, InteractionEvent,
    InvocationError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::debug;

/// Errors returned by [`Dispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum InteractionError {
    /// The event could not be routed or coerced.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// The handler failed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// A resolved leaf and its coerced arguments, ready to invoke.
pub struct PendingInvocation<'t, C> {
    command: &'t Command<C>,
    arguments: Arguments,
}

impl<C> PendingInvocation<'_, C> {
    /// Returns the resolved command.
    #[must_use]
    pub const fn command(&self) -> &Command<C> {
        self.command
    }

    /// Returns the coerced arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

impl<C: Send + 'static> PendingInvocation<'_, C> {
    /// Runs the handler with `context` in an isolated task.
    ///
    /// # Errors
    ///
    /// Returns [`InvocationError`] when the handler fails or panics.
    pub async fn invoke(self, context: C) -> Result<(), InvocationError> {
        let handler = self.command.handler();
        let arguments = self.arguments;
        let outcome = tokio::spawn(async move { handler.invoke(context, arguments).await }).await;
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(InvocationError::new(self.command.path(), source)),
            Err(join_error) => Err(InvocationError::new(
                self.command.path(),
                Box::new(HandlerPanicked(panic_message(join_error))),
            )),
        }
    }
}

impl<C> std::fmt::Debug for PendingInvocation<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingInvocation")
            .field("command", &self.command.path())
            .field("arguments", &self.arguments)
            .finish()
    }
}

fn panic_message(error: JoinError) -> String {
    error.try_into_panic().map_or_else(
        |cancelled| cancelled.to_string(),
        |payload| {
            payload
                .downcast_ref::<&str>()
                .map(|message| (*message).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "handler panicked with a non-string payload".to_owned())
        },
    )
}

/// Tree lookup, coercion and invocation.
pub struct Dispatcher<C> {
    tree: Arc<CommandTree<C>>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
        }
    }
}

impl<C> std::fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("roots", &self.tree.len())
            .finish()
    }
}

impl<C> Dispatcher<C> {
    /// Creates a dispatcher over a frozen tree.
    #[must_use]
    pub const fn new(tree: Arc<CommandTree<C>>) -> Self {
        Self { tree }
    }

    /// Returns the tree being dispatched against.
    #[must_use]
    pub fn tree(&self) -> &CommandTree<C> {
        &self.tree
    }

    /// Resolves the event's leaf and coerces its options.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when no leaf matches the event path or an
    /// option value cannot be coerced.
    pub fn prepare(
        &self,
        event: &InteractionEvent,
    ) -> Result<PendingInvocation<'_, C>, DispatchError> {
        let command = self
            .tree
            .resolve(event.segments())
            .ok_or_else(|| DispatchError::UnknownCommand { path: event.path() })?;
        let arguments = coercion::coerce_arguments(
            command.path(),
            command.options(),
            &event.options,
            &event.resolved,
        )?;
        debug!(command = %command.path(), arguments = arguments.len(), "prepared invocation");
        Ok(PendingInvocation { command, arguments })
    }
}

impl<C: Send + 'static> Dispatcher<C> {
    /// Routes `event` to its handler and runs it with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::Dispatch`] when the event cannot be
    /// routed and [`InteractionError::Invocation`] when the handler fails.
    pub async fn dispatch(
        &self,
        context: C,
        event: &InteractionEvent,
    ) -> Result<(), InteractionError> {
        let pending = self.prepare(event)?;
        pending.invoke(context).await?;
        Ok(())
    }
}
