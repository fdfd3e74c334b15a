//! The axum HTTP gateway.
//!
//! Routes:
//!
//! - `POST /api/cli` - proxy one command to the chain CLI
//! - `GET /api/keys` - keyring listing, normalized
//! - `GET /api/groups[/{id}]`, `GET /api/journal-entries[/{id}]`,
//!   `GET /api/balances/{address}` - read-through node queries
//! - `GET /health` - liveness
//! - anything else - static assets of the prebuilt dashboard bundle
//!
//! The service is stateless between requests: no retry, no queuing, no
//! cross-request ordering. Request failures never take the daemon down.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ledgergate_core::command::LedgerCommand;
use ledgergate_core::config::Config;
use ledgergate_core::types::CliRequest;

use super::protocol::{exec_error_response, query_error_response, ErrorBody};
use crate::exec::CommandExecutor;
use crate::query::{normalize_keys, NodeClient};

/// Maximum accepted request body size (1 MiB).
const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Errors that can occur while running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that failed to bind.
        addr: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The accept/serve loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Executes gateway commands as subprocesses.
    pub executor: Arc<CommandExecutor>,
    /// Read-only node REST client.
    pub node: Arc<NodeClient>,
}

/// The gateway HTTP server.
pub struct GatewayServer {
    config: Arc<Config>,
    state: AppState,
}

impl std::fmt::Debug for GatewayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GatewayServer {
    /// Creates a server from configuration and shared components.
    #[must_use]
    pub fn new(config: Config, executor: Arc<CommandExecutor>, node: Arc<NodeClient>) -> Self {
        Self {
            config: Arc::new(config),
            state: AppState { executor, node },
        }
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the address cannot be bound,
    /// or [`ServerError::Serve`] when the accept loop fails.
    pub async fn run(self, shutdown: oneshot::Receiver<()>) -> Result<(), ServerError> {
        let addr = format!(
            "{}:{}",
            self.config.server.bind_addr, self.config.server.port
        );
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve_on(listener, shutdown).await
    }

    /// Serves on an already-bound listener until `shutdown` fires.
    ///
    /// Split from [`GatewayServer::run`] so tests can bind an ephemeral
    /// port first.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] when the accept loop fails.
    pub async fn serve_on(
        self,
        listener: TcpListener,
        shutdown: oneshot::Receiver<()>,
    ) -> Result<(), ServerError> {
        if let Ok(local) = listener.local_addr() {
            tracing::info!(
                addr = %local,
                static_dir = %self.config.server.static_dir,
                "gateway listening"
            );
        }

        let app = build_router(&self.config, self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.await;
                tracing::info!("shutdown signal received");
            })
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// Assembles the router: API routes, layers, and the static fallback.
fn build_router(config: &Config, state: AppState) -> Router {
    Router::new()
        .route("/api/cli", post(cli_handler))
        .route("/api/keys", get(keys_handler))
        .route("/api/groups", get(groups_handler))
        .route("/api/groups/:id", get(group_handler))
        .route("/api/journal-entries", get(journal_entries_handler))
        .route("/api/journal-entries/:id", get(journal_entry_handler))
        .route("/api/balances/:address", get(balances_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .with_state(state)
}

/// `POST /api/cli` - proxy one command invocation.
async fn cli_handler(State(state): State<AppState>, Json(request): Json<CliRequest>) -> Response {
    let Ok(command) = request.command.parse::<LedgerCommand>() else {
        tracing::debug!(command = %request.command, "rejected unrecognized command");
        return (StatusCode::BAD_REQUEST, Json(ErrorBody::invalid_command())).into_response();
    };

    match state.executor.run(command, &request.params).await {
        Ok(output) => (StatusCode::OK, Json(output.into_value())).into_response(),
        Err(err) => {
            let (status, body) = exec_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/keys` - list keyring entries, normalized.
async fn keys_handler(State(state): State<AppState>) -> Response {
    match state
        .executor
        .run(LedgerCommand::ListKeys, &ledgergate_core::types::ParamMap::new())
        .await
    {
        Ok(output) => (StatusCode::OK, Json(normalize_keys(output.into_value()))).into_response(),
        Err(err) => {
            let (status, body) = exec_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/groups`
async fn groups_handler(State(state): State<AppState>) -> Response {
    match state.node.groups().await {
        Ok(groups) => (StatusCode::OK, Json(groups)).into_response(),
        Err(err) => {
            let (status, body) = query_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/groups/{id}`
async fn group_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.node.group(&id).await {
        Ok(group) => (StatusCode::OK, Json(group)).into_response(),
        Err(err) => {
            let (status, body) = query_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/journal-entries`
async fn journal_entries_handler(State(state): State<AppState>) -> Response {
    match state.node.journal_entries().await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => {
            let (status, body) = query_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/journal-entries/{id}`
async fn journal_entry_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.node.journal_entry(&id).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => {
            let (status, body) = query_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /api/balances/{address}`
async fn balances_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Response {
    match state.node.balances(&address).await {
        Ok(coins) => (StatusCode::OK, Json(coins)).into_response(),
        Err(err) => {
            let (status, body) = query_error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

/// `GET /health`
async fn health_handler() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}
