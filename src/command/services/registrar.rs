//! Reconciles the local command tree with the remote registry.
//!
//! Each deployment scope the tree addresses is reconciled in turn. Root
//! nodes are diffed by name against the remote chat-input commands: absent
//! remotely means create, present but serialising differently means
//! update, identical means leave alone. Every other remote command is
//! deleted, including commands of other types and same-name duplicates.
//! Each platform call is retried on its own; the pass as a whole is not
//! atomic.

use crate::command::{
    config::{ClientConfig, RetryPolicy},
    domain::{CHAT_INPUT_TYPE, CommandId, CommandNode, CommandPayload, CommandTree, DeploymentScope},
    ports::{CommandPlatform, PlatformError, PlatformResult, RegisteredCommand},
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use mockable::Clock;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while synchronising commands.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The platform refused a command's schema.
    #[error("platform rejected '/{command}' ({status}): {message}")]
    Rejected {
        /// Name of the offending root command.
        command: String,
        /// HTTP-style status code.
        status: u16,
        /// Platform message, with index references replaced by the name.
        message: String,
    },

    /// A retryable failure persisted through every attempt.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// The operation that failed.
        operation: String,
        /// Attempts made.
        attempts: u32,
        /// The last failure.
        #[source]
        source: PlatformError,
    },

    /// A non-retryable platform failure outside any single command.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Outcome of a synchronisation pass over every scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Root commands registered for the first time.
    pub created: Vec<String>,
    /// Root commands whose schema was replaced.
    pub updated: Vec<String>,
    /// Remote-only commands removed.
    pub deleted: Vec<String>,
    /// Root commands already up to date.
    pub unchanged: Vec<String>,
    /// Remote id of every local root command.
    pub command_ids: IndexMap<String, CommandId>,
    /// Scopes reconciled, in the order they were visited.
    pub scopes: Vec<DeploymentScope>,
    /// When the pass completed.
    pub synchronized_at: DateTime<Utc>,
}

impl SyncReport {
    /// Returns `true` when the pass changed nothing remotely.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    /// Returns the remote id of root command `name`.
    #[must_use]
    pub fn command_id(&self, name: &str) -> Option<CommandId> {
        self.command_ids.get(name).copied()
    }
}

#[derive(Debug, Default)]
struct Changes {
    created: Vec<String>,
    updated: Vec<String>,
    deleted: Vec<String>,
    unchanged: Vec<String>,
    command_ids: IndexMap<String, CommandId>,
}

/// Remote commands of one scope, split by what the diff may do with them.
#[derive(Debug, Default)]
struct RemoteCommands {
    /// The first chat-input command of each name; reused when a local root
    /// has that name.
    reusable: IndexMap<String, RegisteredCommand>,
    /// Commands of other types and later same-name duplicates.
    stale: Vec<RegisteredCommand>,
}

impl RemoteCommands {
    fn partition(remote: Vec<RegisteredCommand>) -> Self {
        let mut commands = Self::default();
        for command in remote {
            let is_chat_input = command.payload.kind == CHAT_INPUT_TYPE;
            if is_chat_input && !commands.reusable.contains_key(&command.payload.name) {
                commands
                    .reusable
                    .insert(command.payload.name.clone(), command);
            } else {
                commands.stale.push(command);
            }
        }
        commands
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation<'a> {
    List,
    Create(&'a str),
    Update(&'a str),
    Delete(&'a str),
}

impl fmt::Display for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("listing commands"),
            Self::Create(name) => write!(f, "creating '/{name}'"),
            Self::Update(name) => write!(f, "updating '/{name}'"),
            Self::Delete(name) => write!(f, "deleting '/{name}'"),
        }
    }
}

/// Command synchronisation service.
#[derive(Clone)]
pub struct Registrar<P, C>
where
    P: CommandPlatform,
    C: Clock + Send + Sync,
{
    platform: Arc<P>,
    clock: Arc<C>,
    default_scope: DeploymentScope,
    retry: RetryPolicy,
}

impl<P, C> Registrar<P, C>
where
    P: CommandPlatform,
    C: Clock + Send + Sync,
{
    /// Creates a registrar for the default scope and retry policy in
    /// `config`.
    #[must_use]
    pub const fn new(platform: Arc<P>, clock: Arc<C>, config: ClientConfig) -> Self {
        Self {
            platform,
            clock,
            default_scope: config.scope,
            retry: config.retry,
        }
    }

    /// Brings every remote command set `tree` addresses in line with it.
    ///
    /// The default scope is always reconciled, then each scope a root
    /// overrides it with, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Rejected`] when the platform refuses a
    /// command, [`RegistrationError::RetriesExhausted`] when a transient
    /// failure outlasts the retry policy, and [`RegistrationError::Platform`]
    /// when listing is refused outright. Operations applied before the
    /// failure stay applied.
    pub async fn synchronize<H>(
        &self,
        tree: &CommandTree<H>,
    ) -> Result<SyncReport, RegistrationError> {
        let scopes = tree.scopes(self.default_scope);
        let mut changes = Changes::default();
        for &scope in &scopes {
            let roots: Vec<&CommandNode<H>> = tree.roots_in(scope, self.default_scope).collect();
            self.synchronize_scope(scope, &roots, &mut changes).await?;
        }

        let report = SyncReport {
            created: changes.created,
            updated: changes.updated,
            deleted: changes.deleted,
            unchanged: changes.unchanged,
            command_ids: changes.command_ids,
            scopes,
            synchronized_at: self.clock.utc(),
        };
        info!(
            scopes = report.scopes.len(),
            created = report.created.len(),
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            unchanged = report.unchanged.len(),
            "command synchronisation finished"
        );
        Ok(report)
    }

    async fn synchronize_scope<H>(
        &self,
        scope: DeploymentScope,
        roots: &[&CommandNode<H>],
        changes: &mut Changes,
    ) -> Result<(), RegistrationError> {
        info!(%scope, roots = roots.len(), "synchronising commands");

        let platform = &*self.platform;
        let remote = self
            .with_retry(Operation::List, move || platform.list_commands(scope))
            .await?;
        let RemoteCommands {
            mut reusable,
            mut stale,
        } = RemoteCommands::partition(remote);

        for node in roots {
            let payload = node.to_payload();
            let name = payload.name.clone();
            let id = match reusable.shift_remove(&name) {
                None => {
                    let registered = self.create(scope, &payload).await?;
                    changes.created.push(name.clone());
                    registered.id
                }
                Some(existing) if existing.payload == payload => {
                    debug!(%scope, command = %name, "command is up to date");
                    changes.unchanged.push(name.clone());
                    existing.id
                }
                Some(existing) => {
                    let registered = self.update(scope, existing.id, &payload).await?;
                    changes.updated.push(name.clone());
                    registered.id
                }
            };
            changes.command_ids.insert(name, id);
        }

        stale.extend(reusable.into_values());
        for RegisteredCommand { id, payload } in stale {
            self.with_retry(Operation::Delete(&payload.name), move || {
                platform.delete_command(scope, id)
            })
            .await?;
            debug!(%scope, command = %payload.name, kind = payload.kind, "deleted stale command");
            changes.deleted.push(payload.name);
        }
        Ok(())
    }

    async fn create(
        &self,
        scope: DeploymentScope,
        payload: &CommandPayload,
    ) -> Result<RegisteredCommand, RegistrationError> {
        let platform = &*self.platform;
        let registered = self
            .with_retry(Operation::Create(&payload.name), move || {
                platform.create_command(scope, payload)
            })
            .await?;
        debug!(%scope, command = %payload.name, id = %registered.id, "created command");
        Ok(registered)
    }

    async fn update(
        &self,
        scope: DeploymentScope,
        id: CommandId,
        payload: &CommandPayload,
    ) -> Result<RegisteredCommand, RegistrationError> {
        let platform = &*self.platform;
        let registered = self
            .with_retry(Operation::Update(&payload.name), move || {
                platform.update_command(scope, id, payload)
            })
            .await?;
        debug!(%scope, command = %payload.name, id = %registered.id, "updated command");
        Ok(registered)
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: Operation<'_>,
        mut call: F,
    ) -> Result<T, RegistrationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PlatformResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(reject(operation, error));
            }
            if attempt >= self.retry.max_attempts {
                return Err(RegistrationError::RetriesExhausted {
                    operation: operation.to_string(),
                    attempts: attempt,
                    source: error,
                });
            }

            let mut delay = self.retry.backoff(attempt);
            if let PlatformError::RateLimited { retry_after } = &error {
                delay = delay.max(*retry_after);
            }
            warn!(%operation, attempt, ?delay, %error, "platform call failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn reject(operation: Operation<'_>, error: PlatformError) -> RegistrationError {
    let command = match operation {
        Operation::Create(name) | Operation::Update(name) | Operation::Delete(name) => name,
        Operation::List => return RegistrationError::Platform(error),
    };
    match error {
        PlatformError::Rejected { status, message } => RegistrationError::Rejected {
            command: command.to_owned(),
            status,
            message: name_index_references(&message, command),
        },
        other => RegistrationError::Platform(other),
    }
}

/// Rewrites every `In <index>` reference followed by `.` or `:` to name
/// the command, wherever it appears in the message.
fn name_index_references(message: &str, command: &str) -> String {
    let mut rewritten = String::with_capacity(message.len());
    let mut rest = message;
    while let Some((before, after)) = rest.split_once("In ") {
        rewritten.push_str(before);
        let tail = after.trim_start_matches(|c: char| c.is_ascii_digit());
        if tail.len() < after.len() && tail.starts_with(['.', ':']) {
            rewritten.push_str("In /");
            rewritten.push_str(command);
            rest = tail;
        } else {
            rewritten.push_str("In ");
            rest = after;
        }
    }
    rewritten.push_str(rest);
    rewritten
}
