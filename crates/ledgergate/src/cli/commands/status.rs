//! The `ledgergate status` command.

use std::path::PathBuf;

use ledgergate_core::error::ConfigError;

use crate::query::{NodeClient, QueryError};

/// Displays a configuration summary and probes node reachability.
#[derive(Debug, Clone)]
pub struct StatusCommand {
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the status command.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The node client could not be constructed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl StatusCommand {
    /// Creates the command.
    #[must_use]
    pub const fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Prints the status summary.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError`] when configuration cannot be loaded or
    /// the node client cannot be built. An unreachable node is reported,
    /// not an error.
    pub async fn run(&self) -> Result<(), StatusError> {
        let loader = super::loader_for(self.config_path.clone())?;
        let config = loader.load()?;

        println!("Configuration: {}", loader.config_path().display());
        println!(
            "Gateway:       {}:{}",
            config.server.bind_addr, config.server.port
        );
        println!(
            "Chain CLI:     {} (chain-id {}, fees {})",
            config.chain.binary, config.chain.chain_id, config.chain.fees
        );
        println!("Node REST:     {}", config.node.rest_url);
        println!(
            "Audit:         {}",
            if config.audit.enabled {
                config.audit.directory.as_str()
            } else {
                "disabled"
            }
        );

        let node = NodeClient::new(&config.node)?;
        let reachable = node.probe().await;
        println!(
            "Node status:   {}",
            if reachable { "reachable" } else { "unreachable" }
        );
        Ok(())
    }
}
