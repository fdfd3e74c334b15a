//! Error type behavior across the public API: Display, sources, and
//! HTTP-contract stability.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::error::Error;

use ledgergate::audit::AuditError;
use ledgergate::cli::commands::{AuditCommandError, InitError, RunError};
use ledgergate::exec::ExecError;
use ledgergate::logging::LogError;
use ledgergate::query::QueryError;
use ledgergate::server::ServerError;
use ledgergate_core::error::{CommandError, ConfigError};

#[test]
fn test_error_sources() {
    let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

    let err = ExecError::Spawn {
        program: "rollkit".to_string(),
        source: io(),
    };
    assert!(err.source().is_some());

    let err = ServerError::Bind {
        addr: "0.0.0.0:3001".to_string(),
        source: io(),
    };
    assert!(err.source().is_some());

    let err = ConfigError::io("/tmp/config.toml", io());
    assert!(err.source().is_some());

    let err = AuditError::Io(io());
    assert!(err.source().is_some());

    let err = ExecError::Timeout { seconds: 60 };
    assert!(err.source().is_none());

    let err = CommandError::unknown("whatever");
    assert!(err.source().is_none());
}

#[test]
fn test_display_messages() {
    let err = ExecError::Timeout { seconds: 60 };
    assert!(err.to_string().contains("60"));

    let err = ExecError::Failed {
        status: Some(13),
        stderr: "nope".to_string(),
    };
    assert!(err.to_string().contains("13"));

    let err = ExecError::Failed {
        status: None,
        stderr: String::new(),
    };
    assert!(err.to_string().contains("unknown"));

    let err = QueryError::Status {
        status: 503,
        url: "http://node/x".to_string(),
    };
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("http://node/x"));

    let err = LogError::InvalidConfig("bad".to_string());
    assert!(err.to_string().contains("bad"));

    let err = InitError::AlreadyInitialized("/tmp/config.toml".to_string());
    assert!(err.to_string().contains("--force"));

    let err = RunError::BadParam("justakey".to_string());
    assert!(err.to_string().contains("KEY=VALUE"));

    let err = AuditCommandError::ChainInvalid(7);
    assert!(err.to_string().contains('7'));
}

#[test]
fn test_unknown_command_display_is_the_http_contract() {
    // The 400 body is built from this Display; it must stay exactly
    // "Invalid command" for legacy dashboard clients.
    let err = CommandError::unknown("anything at all");
    assert_eq!(err.to_string(), "Invalid command");
}

#[test]
fn test_command_error_converts_into_exec_error() {
    let err: ExecError = CommandError::unknown("x").into();
    assert!(matches!(
        err,
        ExecError::Command(CommandError::UnknownCommand { .. })
    ));
}

#[test]
fn test_exec_error_stderr_accessor() {
    let err = ExecError::Failed {
        status: Some(1),
        stderr: "boom".to_string(),
    };
    assert_eq!(err.stderr(), Some("boom"));

    let err = ExecError::Timeout { seconds: 5 };
    assert!(err.stderr().is_none());
}
