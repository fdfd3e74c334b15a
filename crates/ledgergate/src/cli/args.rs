//! CLI argument definitions using clap derive macros.
//!
//! ## Structure
//!
//! - `ledgergate init [--force]` - write the default configuration
//! - `ledgergate status` - config summary and node reachability
//! - `ledgergate config [show|path]` - inspect configuration
//! - `ledgergate serve [--foreground]` - run the HTTP gateway
//! - `ledgergate run <COMMAND> [--param KEY=VALUE ...]` - one-shot
//!   invocation from the terminal
//! - `ledgergate audit verify` - verify the audit chain
//!
//! ## Global Options
//!
//! - `-v, --verbose` - increase verbosity (repeatable)
//! - `-c, --config <PATH>` - explicit configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command gateway for an accounting-ledger blockchain.
///
/// Proxies dashboard requests to the chain CLI as argument-vector
/// subprocess invocations and normalizes their output.
#[derive(Debug, Parser)]
#[command(name = "ledgergate")]
#[command(author, version, about = "Accounting-ledger command gateway")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the configuration file
    ///
    /// Defaults to `~/.ledgergate/config.toml`.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display configuration summary and node reachability
    Status,

    /// View configuration
    Config {
        /// Configuration action (defaults to `show`)
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Start the HTTP gateway
    Serve {
        /// Run in the foreground (the only supported mode)
        #[arg(short, long)]
        foreground: bool,
    },

    /// Run one gateway command and print the normalized JSON result
    ///
    /// Transaction commands submit real, fee-paying, auto-confirmed
    /// transactions, exactly as the HTTP gateway does.
    Run {
        /// Command name, e.g. `list-keys` or `create-group`
        #[arg(value_name = "COMMAND")]
        command: String,

        /// Command parameter as KEY=VALUE (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Audit log operations
    Audit {
        /// Audit action to perform
        #[command(subcommand)]
        action: AuditAction,
    },
}

/// Actions for `ledgergate config`.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

/// Actions for `ledgergate audit`.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum AuditAction {
    /// Verify the HMAC chain of the active audit log
    Verify,
}
