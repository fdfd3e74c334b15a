//! # ledgergate-core
//!
//! Core types, command templates, and configuration for the `ledgergate`
//! command gateway.
//!
//! ## Internal Crate Warning
//!
//! **This crate is an internal implementation detail of `ledgergate`.**
//!
//! The API is **unstable** and may change without notice between any
//! versions, including patch releases. Do not depend on this crate
//! directly; install the `ledgergate` binary instead.
//!
//! ## Modules
//!
//! - [`command`] - The recognized ledger commands and their argv templates
//! - [`config`] - Configuration structures ([`Config`], [`ChainConfig`], ...)
//! - [`config_loader`] - Loading and saving configuration files
//! - [`error`] - Error types shared across the gateway crates
//! - [`types`] - Request/response data types and query DTOs
//!
//! ## Command Rendering
//!
//! The heart of the crate is [`LedgerCommand::to_invocation`], which turns
//! a logical command name plus a parameter map into an argument vector for
//! the external chain CLI. Rendering is deliberately an argument *vector*,
//! never a flat shell string, so parameter values can never alter which
//! program runs or how many arguments it receives:
//!
//! ```rust
//! use ledgergate_core::command::LedgerCommand;
//! use ledgergate_core::config::ChainConfig;
//! use ledgergate_core::types::ParamMap;
//!
//! let chain = ChainConfig::default();
//! let params = ParamMap::new();
//! let invocation = LedgerCommand::ListKeys
//!     .to_invocation(&params, &chain)
//!     .expect("list-keys takes no parameters");
//!
//! assert_eq!(invocation.program, "rollkit");
//! assert_eq!(
//!     invocation.args,
//!     ["keys", "list", "--keyring-backend", "test", "--output", "json"]
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use command::{CommandInvocation, LedgerCommand};
pub use config::{AuditConfig, ChainConfig, Config, NodeConfig, ServerConfig};
pub use config_loader::{expand_path, load_config, ConfigLoader};
pub use error::{CommandError, ConfigError};
pub use types::{CliRequest, CommandOutput, ParamMap, ParamValue};
