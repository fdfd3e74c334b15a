//! Loading and saving configuration files.
//!
//! Handles path expansion (`~` to the home directory), sensible defaults
//! when no file exists, and environment overrides. The default location
//! is `~/.ledgergate/config.toml`.
//!
//! # Examples
//!
//! ```no_run
//! use ledgergate_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::new().expect("home directory available");
//! if !loader.exists() {
//!     loader.write_default().expect("write default config");
//! }
//! let config = loader.load().expect("load config");
//! println!("gateway port: {}", config.server.port);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConfigError;

/// The configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// The default base directory name within the home directory.
const BASE_DIR_NAME: &str = ".ledgergate";

/// Environment variable overriding `server.port`.
const ENV_PORT: &str = "LEDGERGATE_PORT";

/// Environment variable overriding `node.rest_url`.
const ENV_NODE_URL: &str = "LEDGERGATE_NODE_URL";

/// Reads and writes the gateway configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory holding the config file.
    base_dir: PathBuf,
    /// Explicit config file path, when the user passed `--config`.
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Creates a loader rooted at the default base directory
    /// (`~/.ledgergate`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] when the home directory
    /// cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
            config_file: None,
        })
    }

    /// Creates a loader rooted at a custom base directory.
    #[must_use]
    pub const fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            config_file: None,
        }
    }

    /// Creates a loader for an explicit config file path.
    #[must_use]
    pub fn with_config_file(path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self {
            base_dir,
            config_file: Some(path),
        }
    }

    /// Path of the configuration file this loader manages.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join(CONFIG_FILE_NAME))
    }

    /// Whether the configuration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    /// Loads the configuration.
    ///
    /// Missing file yields defaults. Environment overrides are applied
    /// after parsing, and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, is not valid
    /// TOML, or fails validation.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config_path();
        let mut config = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| ConfigError::io(path.clone(), e))?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the given configuration, creating the base directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on serialization or I/O failure.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|e| ConfigError::io(self.base_dir.clone(), e))?;
        let content = toml::to_string_pretty(config)?;
        let path = self.config_path();
        fs::write(&path, content).map_err(|e| ConfigError::io(path, e))
    }

    /// Writes the commented default configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on I/O failure.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|e| ConfigError::io(self.base_dir.clone(), e))?;
        let path = self.config_path();
        fs::write(&path, Config::default_toml()).map_err(|e| ConfigError::io(path, e))
    }
}

/// Loads configuration from the default location.
///
/// Convenience wrapper over [`ConfigLoader::new`] + [`ConfigLoader::load`].
///
/// # Errors
///
/// Returns [`ConfigError`] when the home directory is unavailable or the
/// file is unreadable/invalid.
pub fn load_config() -> Result<Config, ConfigError> {
    ConfigLoader::new()?.load()
}

/// Applies environment overrides to a parsed configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when an override value cannot be
/// parsed (e.g. a non-numeric `LEDGERGATE_PORT`).
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_overrides(
        config,
        std::env::var(ENV_PORT).ok().as_deref(),
        std::env::var(ENV_NODE_URL).ok().as_deref(),
    )
}

/// Override application, split out so tests can pass explicit values.
fn apply_overrides(
    config: &mut Config,
    port: Option<&str>,
    node_url: Option<&str>,
) -> Result<(), ConfigError> {
    if let Some(raw) = port {
        let parsed = raw.parse::<u16>().map_err(|_| {
            ConfigError::invalid(format!("{ENV_PORT} must be a port number, got '{raw}'"))
        })?;
        config.server.port = parsed;
    }
    if let Some(url) = node_url {
        config.node.rest_url = url.to_string();
    }
    Ok(())
}

/// Expands a leading `~` in a path to the user's home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] when expansion is needed but
/// the home directory cannot be determined.
///
/// # Examples
///
/// ```no_run
/// use ledgergate_core::config_loader::expand_path;
///
/// let path = expand_path("~/.ledgergate/audit").expect("expandable");
/// assert!(path.is_absolute());
///
/// let absolute = expand_path("/var/lib/ledgergate").expect("absolute passes through");
/// assert_eq!(absolute, std::path::PathBuf::from("/var/lib/ledgergate"));
/// ```
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if let Some(stripped) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
        return Ok(home.join(stripped));
    }
    if path == "~" {
        return dirs::home_dir().ok_or_else(ConfigError::no_home_directory);
    }
    Ok(Path::new(path).to_path_buf())
}
