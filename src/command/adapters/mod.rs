//! Adapter implementations for command framework ports.

pub mod memory;

pub use memory::{InMemoryCommandPlatform, PlatformOperation};
