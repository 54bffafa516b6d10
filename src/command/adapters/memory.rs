//! In-memory command platform for tests and local runs.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::command::{
    domain::{CommandId, CommandPayload, DeploymentScope},
    ports::{CommandPlatform, PlatformError, PlatformResult, RegisteredCommand},
};

/// A successful mutation recorded by [`InMemoryCommandPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformOperation {
    /// A command was created.
    Create {
        /// Target scope.
        scope: DeploymentScope,
        /// Command name.
        name: String,
    },
    /// A command was replaced.
    Update {
        /// Target scope.
        scope: DeploymentScope,
        /// Command name.
        name: String,
    },
    /// A command was removed.
    Delete {
        /// Target scope.
        scope: DeploymentScope,
        /// Command name.
        name: String,
    },
}

/// Thread-safe in-memory command registry.
///
/// Like the real registry, names are unique per scope and command type.
///
/// Records every successful mutation and can be told to fail upcoming
/// calls, in order, with [`InMemoryCommandPlatform::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandPlatform {
    state: Arc<RwLock<InMemoryPlatformState>>,
}

#[derive(Debug, Default)]
struct InMemoryPlatformState {
    scopes: HashMap<DeploymentScope, IndexMap<CommandId, CommandPayload>>,
    next_id: u64,
    operations: Vec<PlatformOperation>,
    pending_failures: VecDeque<PlatformError>,
    calls: usize,
}

impl InMemoryPlatformState {
    fn begin_call(&mut self) -> PlatformResult<()> {
        self.calls += 1;
        self.pending_failures.pop_front().map_or(Ok(()), Err)
    }

    fn allocate_id(&mut self) -> CommandId {
        self.next_id += 1;
        CommandId::new(self.next_id)
    }
}

fn lock_error(err: impl std::fmt::Display) -> PlatformError {
    PlatformError::unavailable(std::io::Error::other(err.to_string()))
}

impl InMemoryCommandPlatform {
    /// Creates an empty platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `payload` directly, bypassing failure injection and the
    /// operation log.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] when the state lock is
    /// poisoned.
    pub fn seed(
        &self,
        scope: DeploymentScope,
        payload: CommandPayload,
    ) -> PlatformResult<CommandId> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = state.allocate_id();
        state.scopes.entry(scope).or_default().insert(id, payload);
        Ok(id)
    }

    /// Makes the next call fail with `error`.
    ///
    /// Calls queue up: each consumes one injected failure.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] when the state lock is
    /// poisoned.
    pub fn fail_next(&self, error: PlatformError) -> PlatformResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.pending_failures.push_back(error);
        Ok(())
    }

    /// Returns the commands registered in `scope`, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] when the state lock is
    /// poisoned.
    pub fn commands(&self, scope: DeploymentScope) -> PlatformResult<Vec<CommandPayload>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .scopes
            .get(&scope)
            .map(|commands| commands.values().cloned().collect())
            .unwrap_or_default())
    }

    /// Returns the successful mutations so far.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] when the state lock is
    /// poisoned.
    pub fn operations(&self) -> PlatformResult<Vec<PlatformOperation>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.operations.clone())
    }

    /// Returns the number of calls received, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] when the state lock is
    /// poisoned.
    pub fn call_count(&self) -> PlatformResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.calls)
    }
}

#[async_trait]
impl CommandPlatform for InMemoryCommandPlatform {
    async fn list_commands(
        &self,
        scope: DeploymentScope,
    ) -> PlatformResult<Vec<RegisteredCommand>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.begin_call()?;
        Ok(state
            .scopes
            .get(&scope)
            .map(|commands| {
                commands
                    .iter()
                    .map(|(id, payload)| RegisteredCommand {
                        id: *id,
                        payload: payload.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_command(
        &self,
        scope: DeploymentScope,
        payload: &CommandPayload,
    ) -> PlatformResult<RegisteredCommand> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.begin_call()?;

        let taken = state.scopes.get(&scope).is_some_and(|commands| {
            commands
                .values()
                .any(|existing| existing.name == payload.name && existing.kind == payload.kind)
        });
        if taken {
            return Err(PlatformError::Rejected {
                status: 400,
                message: "In 0.name: Application command names must be unique".to_owned(),
            });
        }

        let id = state.allocate_id();
        state
            .scopes
            .entry(scope)
            .or_default()
            .insert(id, payload.clone());
        state.operations.push(PlatformOperation::Create {
            scope,
            name: payload.name.clone(),
        });
        Ok(RegisteredCommand {
            id,
            payload: payload.clone(),
        })
    }

    async fn update_command(
        &self,
        scope: DeploymentScope,
        id: CommandId,
        payload: &CommandPayload,
    ) -> PlatformResult<RegisteredCommand> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.begin_call()?;

        let slot = state
            .scopes
            .get_mut(&scope)
            .and_then(|commands| commands.get_mut(&id))
            .ok_or_else(|| unknown_command(id))?;
        *slot = payload.clone();
        state.operations.push(PlatformOperation::Update {
            scope,
            name: payload.name.clone(),
        });
        Ok(RegisteredCommand {
            id,
            payload: payload.clone(),
        })
    }

    async fn delete_command(&self, scope: DeploymentScope, id: CommandId) -> PlatformResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.begin_call()?;

        let removed = state
            .scopes
            .get_mut(&scope)
            .and_then(|commands| commands.shift_remove(&id))
            .ok_or_else(|| unknown_command(id))?;
        state.operations.push(PlatformOperation::Delete {
            scope,
            name: removed.name,
        });
        Ok(())
    }
}

fn unknown_command(id: CommandId) -> PlatformError {
    PlatformError::Rejected {
        status: 404,
        message: format!("Unknown application command {id}"),
    }
}
