//! HTTP body types and error mapping for the gateway surface.
//!
//! The error contract mirrors the legacy dashboard server so existing
//! clients keep working:
//!
//! - `400 {"error": "Invalid command"}` for an unrecognized command name
//! - `400 {"error": <message>}` for missing/invalid parameters
//! - `500 {"error": <message>, "stderr": <text>}` for execution failures
//! - `504 {"error": <message>}` when the CLI call exceeds its timeout
//! - `502 {"error": <message>}` when the node REST API misbehaves

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use ledgergate_core::error::CommandError;

use crate::exec::ExecError;
use crate::query::QueryError;

/// JSON error payload for every failing gateway response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure message.
    pub error: String,

    /// Captured standard-error text, for execution failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ErrorBody {
    /// The fixed body for unrecognized command names.
    #[must_use]
    pub fn invalid_command() -> Self {
        Self {
            error: "Invalid command".to_string(),
            stderr: None,
        }
    }

    /// A plain error body with no stderr.
    #[must_use]
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stderr: None,
        }
    }
}

/// Maps an execution failure to its HTTP status and body.
#[must_use]
pub fn exec_error_response(err: &ExecError) -> (StatusCode, ErrorBody) {
    match err {
        ExecError::Command(CommandError::UnknownCommand { .. }) => {
            (StatusCode::BAD_REQUEST, ErrorBody::invalid_command())
        }
        ExecError::Command(e) => (StatusCode::BAD_REQUEST, ErrorBody::message(e.to_string())),
        ExecError::Timeout { .. } => {
            (StatusCode::GATEWAY_TIMEOUT, ErrorBody::message(err.to_string()))
        }
        ExecError::Failed { stderr, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: err.to_string(),
                stderr: if stderr.trim().is_empty() {
                    None
                } else {
                    Some(stderr.clone())
                },
            },
        ),
        ExecError::Spawn { .. } | ExecError::Io(_) | ExecError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::message(err.to_string()),
        ),
    }
}

/// Maps a node query failure to its HTTP status and body.
#[must_use]
pub fn query_error_response(err: &QueryError) -> (StatusCode, ErrorBody) {
    (StatusCode::BAD_GATEWAY, ErrorBody::message(err.to_string()))
}
