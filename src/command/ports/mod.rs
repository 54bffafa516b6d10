//! Port contracts for the command framework.
//!
//! Ports separate the core from the remote command registry, the source of
//! resolved entities and user handler code.

pub mod entity;
pub mod handler;
pub mod platform;

pub use entity::EntityLookup;
pub use handler::{CommandHandler, ErrorHandler, HandlerResult};
#[cfg(test)]
pub use platform::MockCommandPlatform;
pub use platform::{CommandPlatform, PlatformError, PlatformResult, RegisteredCommand};
