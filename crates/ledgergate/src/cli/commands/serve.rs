//! The `ledgergate serve` command.
//!
//! Starts the HTTP gateway as a long-running foreground process:
//!
//! - loads and validates configuration,
//! - opens the audit chain when enabled,
//! - builds the executor and node client,
//! - serves until SIGINT/SIGTERM, then shuts down gracefully.

use std::path::PathBuf;
use std::sync::Arc;

use ledgergate_core::config_loader::expand_path;
use ledgergate_core::error::ConfigError;

use crate::audit::{AuditError, CommandAuditLogger};
use crate::exec::CommandExecutor;
use crate::query::{NodeClient, QueryError};
use crate::server::{GatewayServer, ServerError};

/// Starts the gateway server.
#[derive(Debug, Clone)]
pub struct ServeCommand {
    /// Run in the foreground (the only supported mode).
    pub foreground: bool,
    /// Explicit config file path, when given.
    pub config_path: Option<PathBuf>,
}

/// Errors from the serve command.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Underlying configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The audit logger could not be opened.
    #[error("audit logger error: {0}")]
    Audit(#[from] AuditError),

    /// The node client could not be constructed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The HTTP server failed.
    #[error(transparent)]
    Server(#[from] ServerError),
}

impl ServeCommand {
    /// Runs the gateway until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError`] when configuration, audit setup, or the
    /// HTTP server fails.
    pub async fn run(&self) -> Result<(), ServeError> {
        if !self.foreground {
            tracing::info!("daemon mode is not implemented; running in foreground");
        }

        let loader = super::loader_for(self.config_path.clone())?;
        let config = loader.load()?;

        let audit = if config.audit.enabled {
            let dir = expand_path(&config.audit.directory)?;
            let logger = CommandAuditLogger::open_or_init(&dir)?;
            tracing::info!(dir = %dir.display(), "audit chain enabled");
            Some(Arc::new(logger))
        } else {
            None
        };

        let executor = Arc::new(CommandExecutor::new(config.chain.clone(), audit));
        let node = Arc::new(NodeClient::new(&config.node)?);
        let server = GatewayServer::new(config, executor, node);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            wait_for_shutdown_signal().await;
            let _ = shutdown_tx.send(());
        });

        server.run(shutdown_rx).await?;
        Ok(())
    }
}

/// Completes when SIGINT (ctrl-c) or, on Unix, SIGTERM arrives.
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
