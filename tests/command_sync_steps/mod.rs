//! Step definitions for command synchronisation scenarios.

mod given;
mod then;
mod when;
pub mod world;
