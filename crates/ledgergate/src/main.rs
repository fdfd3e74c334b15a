//! # ledgergate
//!
//! Command gateway daemon for an accounting-ledger blockchain.
//!
//! ## Usage
//!
//! ```bash
//! # Write the default configuration
//! ledgergate init
//!
//! # Display current status
//! ledgergate status
//!
//! # Start the gateway
//! ledgergate serve --foreground
//!
//! # One-shot command invocation
//! ledgergate run list-keys
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use clap::Parser;

use ledgergate::cli::commands::{
    AuditCommand, AuditCommandError, ConfigCommand, InitCommand, RunCommand, RunError,
    ServeCommand, StatusCommand, EXIT_COMMAND_FAILED, EXIT_ERROR,
};
use ledgergate::cli::{Cli, Commands};
use ledgergate::exec::ExecError;
use ledgergate::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogGuard};

/// Sets up logging from the `-v` count.
fn setup_logging(verbose: u8) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(verbose),
        ..LogConfig::default()
    };
    init_logging(&config)
}

/// A command failure carrying the exit code to report.
struct CommandFailure {
    code: i32,
    message: String,
}

/// Wraps any command error as a general failure (exit code 2).
fn general_failure(err: &dyn std::error::Error) -> CommandFailure {
    CommandFailure {
        code: EXIT_ERROR,
        message: err.to_string(),
    }
}

fn main() {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let config_path = cli.config;

    let exit_code = match cli.command {
        Commands::Init { force } => finish(
            InitCommand::new(force, config_path)
                .run()
                .map_err(|e| general_failure(&e)),
        ),
        Commands::Status => run_async(async {
            StatusCommand::new(config_path)
                .run()
                .await
                .map_err(|e| general_failure(&e))
        }),
        Commands::Config { action } => finish(
            ConfigCommand::new(action, config_path)
                .run()
                .map_err(|e| general_failure(&e)),
        ),
        Commands::Serve { foreground } => run_async(async {
            ServeCommand {
                foreground,
                config_path,
            }
            .run()
            .await
            .map_err(|e| general_failure(&e))
        }),
        Commands::Run { command, params } => {
            let cmd = RunCommand {
                command,
                params,
                config_path,
            };
            run_async(handle_run(cmd))
        }
        Commands::Audit { action } => finish(handle_audit(&AuditCommand::new(action, config_path))),
    };

    std::process::exit(exit_code);
}

/// Runs an async command handler on a fresh runtime.
fn run_async(fut: impl std::future::Future<Output = Result<(), CommandFailure>>) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            return EXIT_ERROR;
        }
    };
    finish(rt.block_on(fut))
}

/// Maps a command result to an exit code, printing any failure.
fn finish(result: Result<(), CommandFailure>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(failure) => {
            eprintln!("Error: {}", failure.message);
            failure.code
        }
    }
}

/// Maps `run` failures: an executed-but-failed command exits 1, setup
/// problems exit 2.
async fn handle_run(cmd: RunCommand) -> Result<(), CommandFailure> {
    cmd.run().await.map_err(|err| {
        let code = match &err {
            RunError::Exec(ExecError::Failed { .. } | ExecError::Timeout { .. }) => {
                EXIT_COMMAND_FAILED
            }
            _ => EXIT_ERROR,
        };
        CommandFailure {
            code,
            message: err.to_string(),
        }
    })
}

/// Maps audit failures: an invalid chain exits 1, setup problems exit 2.
fn handle_audit(cmd: &AuditCommand) -> Result<(), CommandFailure> {
    cmd.run().map_err(|err| {
        let code = match &err {
            AuditCommandError::ChainInvalid(_) => EXIT_COMMAND_FAILED,
            _ => EXIT_ERROR,
        };
        CommandFailure {
            code,
            message: err.to_string(),
        }
    })
}
