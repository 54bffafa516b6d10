//! Startup ordering and steady-state interaction handling.
//!
//! A [`CommandClient`] collects declarations. [`CommandClient::start`]
//! freezes the tree and synchronises it, and only the [`RunningClient`] it
//! returns can dispatch, so no event is ever routed against a tree that is
//! still being built or registered.

use super::dispatcher::Dispatcher;
use super::registrar::{Registrar, RegistrationError, SyncReport};
use crate::command::{
    config::ClientConfig,
    domain::{
        CommandDecl, CommandTree, CommandTreeBuilder, DispatchError, InteractionEvent,
        InvocationError, NamespaceDecl, SchemaValidationError,
    },
    ports::{CommandPlatform, ErrorHandler},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// A declaration was invalid.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
    /// Synchronisation failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// How an interaction ended.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// The handler returned successfully.
    Completed,
    /// The event could not be routed or coerced; no handler ran.
    Rejected(DispatchError),
    /// The handler failed; the error went to the error handler or the log.
    Failed {
        /// Path of the failing command.
        command: String,
    },
}

/// A client that is still accepting declarations.
pub struct CommandClient<C, P, K>
where
    P: CommandPlatform,
    K: Clock + Send + Sync,
{
    builder: CommandTreeBuilder<C>,
    registrar: Registrar<P, K>,
    error_handler: Option<Arc<dyn ErrorHandler<C>>>,
}

impl<C, P, K> CommandClient<C, P, K>
where
    C: Clone + Send + 'static,
    P: CommandPlatform,
    K: Clock + Send + Sync,
{
    /// Creates a client registering through `platform`.
    #[must_use]
    pub fn new(platform: Arc<P>, clock: Arc<K>, config: ClientConfig) -> Self {
        Self {
            builder: CommandTreeBuilder::new(),
            registrar: Registrar::new(platform, clock, config),
            error_handler: None,
        }
    }

    /// Declares a root command.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when the declaration is invalid.
    pub fn command(
        &mut self,
        declaration: CommandDecl<C>,
    ) -> Result<&mut Self, SchemaValidationError> {
        self.builder.add_command(declaration)?;
        Ok(self)
    }

    /// Declares a root namespace.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError`] when the namespace or any member
    /// is invalid.
    pub fn namespace(
        &mut self,
        declaration: NamespaceDecl<C>,
    ) -> Result<&mut Self, SchemaValidationError> {
        self.builder.add_namespace(declaration)?;
        Ok(self)
    }

    /// Installs the handler that receives every [`InvocationError`].
    pub fn on_error(&mut self, handler: impl ErrorHandler<C> + 'static) -> &mut Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Freezes the tree, synchronises it and enables dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Registration`] when synchronisation fails.
    pub async fn start(self) -> Result<RunningClient<C>, StartupError> {
        let tree = self.builder.build();
        if tree.is_empty() {
            warn!("starting with no commands declared; every remote command will be removed");
        }
        let report = self.registrar.synchronize(&tree).await?;
        info!(roots = tree.len(), "command client ready");
        Ok(RunningClient {
            dispatcher: Dispatcher::new(Arc::new(tree)),
            error_handler: self.error_handler,
            report: Arc::new(report),
        })
    }
}

/// A client whose commands are registered and which dispatches events.
pub struct RunningClient<C> {
    dispatcher: Dispatcher<C>,
    error_handler: Option<Arc<dyn ErrorHandler<C>>>,
    report: Arc<SyncReport>,
}

impl<C> Clone for RunningClient<C> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            error_handler: self.error_handler.clone(),
            report: Arc::clone(&self.report),
        }
    }
}

impl<C> std::fmt::Debug for RunningClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningClient")
            .field("dispatcher", &self.dispatcher)
            .field("has_error_handler", &self.error_handler.is_some())
            .field("report", &self.report)
            .finish()
    }
}

impl<C> RunningClient<C> {
    /// Returns the report of the startup synchronisation.
    #[must_use]
    pub fn sync_report(&self) -> &SyncReport {
        &self.report
    }

    /// Returns the frozen command tree.
    #[must_use]
    pub fn tree(&self) -> &CommandTree<C> {
        self.dispatcher.tree()
    }
}

impl<C: Clone + Send + 'static> RunningClient<C> {
    /// Dispatches one event.
    ///
    /// Never fails: dispatch errors are logged and returned as
    /// [`InteractionOutcome::Rejected`], and handler failures are delivered
    /// to the error handler, or logged when none is installed.
    pub async fn handle_interaction(
        &self,
        context: C,
        event: &InteractionEvent,
    ) -> InteractionOutcome {
        let pending = match self.dispatcher.prepare(event) {
            Ok(pending) => pending,
            Err(dispatch_error) => {
                error!(path = %event.path(), error = %dispatch_error, "interaction rejected");
                return InteractionOutcome::Rejected(dispatch_error);
            }
        };

        let Err(failure) = pending.invoke(context.clone()).await else {
            return InteractionOutcome::Completed;
        };
        let command = failure.command().to_owned();
        self.report_failure(context, failure).await;
        InteractionOutcome::Failed { command }
    }

    async fn report_failure(&self, context: C, failure: InvocationError) {
        let Some(handler) = &self.error_handler else {
            error!(
                command = %failure.command(),
                error = %failure.original(),
                "command handler failed"
            );
            return;
        };
        handler.on_error(context, failure).await;
    }

    /// Dispatches `event` on a new task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_interaction(
        &self,
        context: C,
        event: InteractionEvent,
    ) -> JoinHandle<InteractionOutcome> {
        let client = self.clone();
        tokio::spawn(async move { client.handle_interaction(context, &event).await })
    }
}
