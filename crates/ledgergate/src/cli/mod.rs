//! Command-line interface for `ledgergate`.
//!
//! ## Module Structure
//!
//! - [`args`] - argument parsing and CLI structure definitions
//! - [`commands`] - command handler implementations
//!
//! ## Commands
//!
//! - `ledgergate init [--force]` - write the default configuration
//! - `ledgergate status` - configuration summary and node probe
//! - `ledgergate config [show|path]` - inspect configuration
//! - `ledgergate serve [--foreground]` - run the HTTP gateway
//! - `ledgergate run <COMMAND> [--param KEY=VALUE ...]` - one-shot
//!   gateway invocation
//! - `ledgergate audit verify` - verify the audit chain

pub mod args;
pub mod commands;

pub use args::{AuditAction, Cli, Commands, ConfigAction};
