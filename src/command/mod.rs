//! Slash commands: declaration, schema synchronisation and dispatch.
//!
//! Handlers are declared with typed signatures and assembled into a command
//! tree. The tree is serialised, reconciled with the remote registry, and
//! then used to route inbound interactions to handlers with coerced
//! arguments. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Client configuration in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
