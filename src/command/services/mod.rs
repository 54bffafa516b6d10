//! Application services: synchronisation, dispatch and the client.

mod client;
mod dispatcher;
mod registrar;

pub use client::{CommandClient, InteractionOutcome, RunningClient, StartupError};
pub use dispatcher::{Dispatcher, InteractionError, PendingInvocation};
pub use registrar::{Registrar, RegistrationError, SyncReport};
