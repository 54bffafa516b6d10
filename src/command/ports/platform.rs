//! Port for the remote command registry.

use crate::command::domain::{CommandId, CommandPayload, DeploymentScope};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// A root command as registered on the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredCommand {
    /// Platform-assigned identifier.
    pub id: CommandId,
    /// Registered schema.
    pub payload: CommandPayload,
}

/// Remote command registry contract.
///
/// Every method addresses one deployment scope: the global command set or
/// one guild's.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandPlatform: Send + Sync {
    /// Lists the root commands registered in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] when the registry cannot be read.
    async fn list_commands(&self, scope: DeploymentScope) -> PlatformResult<Vec<RegisteredCommand>>;

    /// Registers a new root command.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Rejected`] when the platform refuses the
    /// schema.
    async fn create_command(
        &self,
        scope: DeploymentScope,
        payload: &CommandPayload,
    ) -> PlatformResult<RegisteredCommand>;

    /// Replaces the schema of an existing root command.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Rejected`] when the platform refuses the
    /// schema or does not know `id`.
    async fn update_command(
        &self,
        scope: DeploymentScope,
        id: CommandId,
        payload: &CommandPayload,
    ) -> PlatformResult<RegisteredCommand>;

    /// Removes a root command.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Rejected`] when the platform does not know
    /// `id`.
    async fn delete_command(&self, scope: DeploymentScope, id: CommandId) -> PlatformResult<()>;
}

/// Errors returned by platform implementations.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// A transient network or server failure.
    #[error("transient platform failure: {0}")]
    Transient(String),

    /// The platform asked the caller to slow down.
    #[error("rate limited; retry after {retry_after:?}")]
    RateLimited {
        /// Minimum wait before the next attempt.
        retry_after: Duration,
    },

    /// The platform refused the request.
    ///
    /// Messages may reference commands and options by index, e.g.
    /// `In 0.options.1: ...`.
    #[error("platform rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Platform error message.
        message: String,
    },

    /// The platform could not be reached at all.
    #[error("platform unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlatformError {
    /// Wraps a connection-level error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Returns `true` when the operation may succeed if retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RateLimited { .. } | Self::Unavailable(_))
    }
}
