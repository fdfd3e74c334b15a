//! The `ledgergate audit` command.

use std::path::PathBuf;

use ledgergate_core::config_loader::expand_path;
use ledgergate_core::error::ConfigError;

use crate::audit::{AuditError, CommandAuditLogger};
use crate::cli::args::AuditAction;

/// Audit log operations.
#[derive(Debug, Clone)]
pub struct AuditCommand {
    /// The action to perform.
    pub action: AuditAction,
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the audit command.
#[derive(Debug, thiserror::Error)]
pub enum AuditCommandError {
    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The audit log could not be opened or read.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// The chain did not verify.
    #[error("audit chain INVALID: first bad entry at seq {0}")]
    ChainInvalid(u64),
}

impl AuditCommand {
    /// Creates the command.
    #[must_use]
    pub const fn new(action: AuditAction, config_path: Option<PathBuf>) -> Self {
        Self {
            action,
            config_path,
        }
    }

    /// Performs the requested action.
    ///
    /// # Errors
    ///
    /// Returns [`AuditCommandError::ChainInvalid`] when verification
    /// finds a tampered entry, or other variants for setup failures.
    pub fn run(&self) -> Result<(), AuditCommandError> {
        match self.action {
            AuditAction::Verify => self.verify(),
        }
    }

    fn verify(&self) -> Result<(), AuditCommandError> {
        let loader = super::loader_for(self.config_path.clone())?;
        let config = loader.load()?;
        let dir = expand_path(&config.audit.directory)?;
        let logger = CommandAuditLogger::open_or_init(&dir)?;

        let result = logger.verify_chain()?;
        if result.valid {
            println!(
                "audit chain OK: {} entries in {}",
                result.entries,
                logger.log_path().display()
            );
            Ok(())
        } else {
            Err(AuditCommandError::ChainInvalid(
                result.first_invalid_seq.unwrap_or(0),
            ))
        }
    }
}
