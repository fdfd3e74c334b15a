//! The `ledgergate init` command.

use std::path::PathBuf;

use ledgergate_core::error::ConfigError;

/// Writes the default configuration file.
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// Overwrite an existing configuration.
    pub force: bool,
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the init command.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// A configuration file already exists and `--force` was not given.
    #[error("configuration already exists at {0}; use --force to overwrite")]
    AlreadyInitialized(String),

    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InitCommand {
    /// Creates the command.
    #[must_use]
    pub const fn new(force: bool, config_path: Option<PathBuf>) -> Self {
        Self { force, config_path }
    }

    /// Writes the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::AlreadyInitialized`] when a config exists and
    /// `--force` was not given, or [`InitError::Config`] on I/O failure.
    pub fn run(&self) -> Result<(), InitError> {
        let loader = super::loader_for(self.config_path.clone())?;
        if loader.exists() && !self.force {
            return Err(InitError::AlreadyInitialized(
                loader.config_path().display().to_string(),
            ));
        }
        loader.write_default()?;
        println!("Wrote {}", loader.config_path().display());
        Ok(())
    }
}
