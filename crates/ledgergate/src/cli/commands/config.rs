//! The `ledgergate config` command.

use std::path::PathBuf;

use ledgergate_core::error::ConfigError;

use crate::cli::args::ConfigAction;

/// Inspects the gateway configuration.
#[derive(Debug, Clone)]
pub struct ConfigCommand {
    /// The action to perform; `None` means `show`.
    pub action: Option<ConfigAction>,
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the config command.
#[derive(Debug, thiserror::Error)]
pub enum ConfigCommandError {
    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConfigCommand {
    /// Creates the command.
    #[must_use]
    pub const fn new(action: Option<ConfigAction>, config_path: Option<PathBuf>) -> Self {
        Self {
            action,
            config_path,
        }
    }

    /// Performs the requested action.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigCommandError`] when the configuration cannot be
    /// loaded or serialized.
    pub fn run(&self) -> Result<(), ConfigCommandError> {
        let loader = super::loader_for(self.config_path.clone())?;
        match self.action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                // Effective configuration: file contents plus defaults
                // plus environment overrides.
                let config = loader.load()?;
                print!("{}", toml::to_string_pretty(&config).map_err(ConfigError::from)?);
            }
            ConfigAction::Path => {
                println!("{}", loader.config_path().display());
            }
        }
        Ok(())
    }
}
