//! Error types shared across the gateway crates.
//!
//! Two error families live here:
//!
//! - [`CommandError`] - failures while resolving or rendering a logical
//!   command into an argument vector. These never have side effects: a
//!   request that fails command rendering never reaches process execution.
//! - [`ConfigError`] - failures while loading, parsing, or validating the
//!   gateway configuration.

use std::path::PathBuf;

/// Errors produced while resolving or rendering a ledger command.
///
/// All variants are client errors: they are reported with a 4xx status by
/// the HTTP layer and no subprocess is ever spawned for them.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command name is not one of the recognized ledger commands.
    #[error("Invalid command")]
    UnknownCommand {
        /// The unrecognized command name as received.
        name: String,
    },

    /// A required parameter is absent or empty.
    #[error("missing required parameter '{param}' for command '{command}'")]
    MissingParam {
        /// The canonical command name.
        command: &'static str,
        /// The missing parameter key.
        param: &'static str,
    },

    /// A parameter is present but its value is not usable.
    #[error("invalid value for parameter '{param}': {reason}")]
    InvalidParam {
        /// The offending parameter key.
        param: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl CommandError {
    /// Creates an [`CommandError::UnknownCommand`] for the given name.
    #[must_use]
    pub fn unknown(name: &str) -> Self {
        Self::UnknownCommand {
            name: name.to_string(),
        }
    }
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing a config file.
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The user's home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// The configuration is structurally valid but semantically unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a [`ConfigError::NoHomeDirectory`] error.
    ///
    /// Exists so call sites can write `ok_or_else(ConfigError::no_home_directory)`.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }

    /// Creates an [`ConfigError::Invalid`] error with the given message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
