//! Command handler implementations.

pub mod audit;
pub mod config;
pub mod exit_codes;
pub mod init;
pub mod run;
pub mod serve;
pub mod status;

use std::path::PathBuf;

use ledgergate_core::config_loader::ConfigLoader;
use ledgergate_core::error::ConfigError;

pub use audit::{AuditCommand, AuditCommandError};
pub use config::{ConfigCommand, ConfigCommandError};
pub use exit_codes::{EXIT_COMMAND_FAILED, EXIT_ERROR, EXIT_SUCCESS};
pub use init::{InitCommand, InitError};
pub use run::{RunCommand, RunError};
pub use serve::{ServeCommand, ServeError};
pub use status::{StatusCommand, StatusError};

/// Builds the config loader for a command, honoring the global
/// `--config` option.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when no explicit path was
/// given and the home directory cannot be determined.
pub(crate) fn loader_for(config_path: Option<PathBuf>) -> Result<ConfigLoader, ConfigError> {
    match config_path {
        Some(path) => Ok(ConfigLoader::with_config_file(path)),
        None => ConfigLoader::new(),
    }
}
