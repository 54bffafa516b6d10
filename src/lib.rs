//! Slashgate: typed slash commands for chat platforms.
//!
//! Declare commands as handlers with typed parameters and structured doc
//! comments, and the crate derives the platform schema, keeps the remote
//! registration in sync, and routes each interaction to the right handler
//! with coerced arguments.
//!
//! # Architecture
//!
//! Slashgate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure schema and dispatch logic with no I/O
//! - **Ports**: Abstract trait interfaces for the platform and user code
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Startup synchronisation and interaction dispatch
//!
//! # Modules
//!
//! - [`command`]: Command declaration, registration and dispatch

pub mod command;
