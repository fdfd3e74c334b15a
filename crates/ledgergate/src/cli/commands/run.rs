//! The `ledgergate run` command.
//!
//! One-shot gateway invocation from the terminal, using the same
//! rendering, validation, execution, and audit path as `POST /api/cli`.

use std::path::PathBuf;
use std::sync::Arc;

use ledgergate_core::command::LedgerCommand;
use ledgergate_core::config_loader::expand_path;
use ledgergate_core::error::ConfigError;
use ledgergate_core::types::{ParamMap, ParamValue};

use crate::audit::{AuditError, CommandAuditLogger};
use crate::exec::{CommandExecutor, ExecError};

/// Runs one gateway command and prints the normalized JSON result.
#[derive(Debug, Clone)]
pub struct RunCommand {
    /// The command name as given on the command line.
    pub command: String,
    /// `KEY=VALUE` parameter strings.
    pub params: Vec<String>,
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the run command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The command name is not recognized.
    #[error("unknown command '{0}'; expected one of: list-keys, create-group, create-journal-entry, send-and-record")]
    UnknownCommand(String),

    /// A `--param` argument is not of the form `KEY=VALUE`.
    #[error("invalid parameter '{0}': expected KEY=VALUE")]
    BadParam(String),

    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The audit logger could not be opened.
    #[error("audit logger error: {0}")]
    Audit(#[from] AuditError),

    /// The command ran but failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The result could not be printed.
    #[error("failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

impl RunCommand {
    /// Executes the command and prints its result to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] for unknown commands, malformed `--param`
    /// values, configuration problems, or execution failures.
    pub async fn run(&self) -> Result<(), RunError> {
        let command: LedgerCommand = self
            .command
            .parse()
            .map_err(|_| RunError::UnknownCommand(self.command.clone()))?;
        let params = parse_params(&self.params)?;

        let loader = super::loader_for(self.config_path.clone())?;
        let config = loader.load()?;

        let audit = if config.audit.enabled {
            let dir = expand_path(&config.audit.directory)?;
            Some(Arc::new(CommandAuditLogger::open_or_init(&dir)?))
        } else {
            None
        };

        let executor = CommandExecutor::new(config.chain, audit);
        let output = executor.run(command, &params).await?;
        println!("{}", serde_json::to_string_pretty(&output.into_value())?);
        Ok(())
    }
}

/// Parses `KEY=VALUE` strings into a parameter map.
///
/// Values may contain `=`; only the first one splits.
fn parse_params(raw: &[String]) -> Result<ParamMap, RunError> {
    let mut params = ParamMap::new();
    for pair in raw {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| RunError::BadParam(pair.clone()))?;
        if key.is_empty() {
            return Err(RunError::BadParam(pair.clone()));
        }
        params.insert(key.to_string(), ParamValue::from(value));
    }
    Ok(params)
}
