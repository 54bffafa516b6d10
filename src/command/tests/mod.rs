//! Unit tests for the command module.
//!
//! Tests are organised by domain concept and service, covering happy paths,
//! rejections and edge cases.

mod schema_tests;
mod support;
mod tree_tests;
