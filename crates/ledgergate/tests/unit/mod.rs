//! Unit-level integration tests against the public API.

pub mod command_props_test;
pub mod error_handling_test;
