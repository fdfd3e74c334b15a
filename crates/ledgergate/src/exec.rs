//! Subprocess execution and output normalization.
//!
//! One child process per request: the handler task suspends until the
//! process exits, the only suspension point in the flow. Execution is
//! always an argument vector handed to the OS directly; no shell ever
//! interprets parameter values.
//!
//! Robustness on top of the bare spawn:
//!
//! - a per-invocation timeout with forced termination,
//! - a semaphore bounding the number of live child processes,
//! - optional per-sender serialization, so transaction submissions that
//!   share a `--from` address cannot race each other's account sequence
//!   numbers at the node.
//!
//! There is no retry anywhere: every failure is reported synchronously
//! to the caller.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::Semaphore;

use ledgergate_core::command::LedgerCommand;
use ledgergate_core::config::ChainConfig;
use ledgergate_core::error::CommandError;
use ledgergate_core::types::{CommandOutput, ParamMap, ParamValue};

use crate::audit::{AuditOutcome, CommandAuditLogger, CommandEvent};
use crate::logging::new_correlation_id;

/// Errors from running a gateway command.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Rendering failed before execution; no process was spawned.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The CLI binary could not be started (missing, not executable).
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The binary that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while waiting for the process.
    #[error("process I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The process exceeded the configured timeout and was killed.
    #[error("command timed out after {seconds}s")]
    Timeout {
        /// The configured timeout.
        seconds: u64,
    },

    /// The process exited with a non-zero status.
    ///
    /// Partial stdout produced before the failure is discarded; the
    /// captured stderr travels with the error.
    #[error("command exited with status {}", .status.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Failed {
        /// The exit code, when the process was not killed by a signal.
        status: Option<i32>,
        /// Captured standard-error text.
        stderr: String,
    },

    /// The executor is shutting down.
    #[error("executor unavailable: {0}")]
    Internal(String),
}

impl ExecError {
    /// The captured stderr for failures that carry one.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Runs gateway commands as bounded, audited subprocesses.
///
/// Shared across request handlers via `Arc`; all internal state is
/// synchronized.
pub struct CommandExecutor {
    chain: ChainConfig,
    permits: Arc<Semaphore>,
    sender_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    audit: Option<Arc<CommandAuditLogger>>,
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("chain", &self.chain)
            .field("audit", &self.audit.is_some())
            .finish_non_exhaustive()
    }
}

impl CommandExecutor {
    /// Creates an executor for the given chain configuration.
    #[must_use]
    pub fn new(chain: ChainConfig, audit: Option<Arc<CommandAuditLogger>>) -> Self {
        let permits = Arc::new(Semaphore::new(chain.max_concurrent_commands));
        Self {
            chain,
            permits,
            sender_locks: Mutex::new(HashMap::new()),
            audit,
        }
    }

    /// Runs one command to completion and normalizes its output.
    ///
    /// # Errors
    ///
    /// - [`ExecError::Command`] when rendering/validation fails; no
    ///   process is spawned.
    /// - [`ExecError::Spawn`] when the binary cannot be started.
    /// - [`ExecError::Timeout`] when the process outlives the configured
    ///   timeout; the child is killed.
    /// - [`ExecError::Failed`] when the process exits non-zero,
    ///   regardless of any partial stdout.
    pub async fn run(
        &self,
        command: LedgerCommand,
        params: &ParamMap,
    ) -> Result<CommandOutput, ExecError> {
        let invocation = command.to_invocation(params, &self.chain)?;
        let correlation_id = new_correlation_id();
        let from_address = params.get("fromAddress").map(ParamValue::render);

        if command.submits_transaction() {
            // -y auto-confirms: this spends real fees with no interactive
            // step between here and the chain.
            tracing::warn!(
                %correlation_id,
                command = %command,
                from = from_address.as_deref().unwrap_or(""),
                "submitting auto-confirmed fee-paying transaction"
            );
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ExecError::Internal(e.to_string()))?;

        let _sender_guard = match &from_address {
            Some(sender)
                if self.chain.serialize_by_sender && command.submits_transaction() =>
            {
                Some(self.sender_lock(sender).lock_owned().await)
            }
            _ => None,
        };

        tracing::info!(
            %correlation_id,
            command = %command,
            invocation = %invocation.display_line(),
            "executing command"
        );

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                let err = ExecError::Spawn {
                    program: invocation.program.clone(),
                    source,
                };
                self.record(command, &invocation.display_line(), &correlation_id,
                    from_address.clone(), AuditOutcome::Failed, None);
                err
            })?;

        let timeout = Duration::from_secs(self.chain.command_timeout_secs);
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                self.record(command, &invocation.display_line(), &correlation_id,
                    from_address, AuditOutcome::Failed, None);
                return Err(ExecError::Io(e));
            }
            Err(_elapsed) => {
                // Dropping the wait future reaps the child via
                // kill_on_drop.
                tracing::error!(
                    %correlation_id,
                    command = %command,
                    timeout_secs = self.chain.command_timeout_secs,
                    "command timed out, killing process"
                );
                self.record(command, &invocation.display_line(), &correlation_id,
                    from_address, AuditOutcome::Timeout, None);
                return Err(ExecError::Timeout {
                    seconds: self.chain.command_timeout_secs,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::error!(
                %correlation_id,
                command = %command,
                status = ?output.status.code(),
                stderr = %stderr.trim(),
                "command failed"
            );
            self.record(command, &invocation.display_line(), &correlation_id,
                from_address, AuditOutcome::Failed, output.status.code());
            return Err(ExecError::Failed {
                status: output.status.code(),
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            // Successful exit: stderr is informational and does not
            // change the result.
            tracing::warn!(
                %correlation_id,
                command = %command,
                stderr = %stderr.trim(),
                "command wrote to stderr on success"
            );
        }

        self.record(command, &invocation.display_line(), &correlation_id,
            from_address, AuditOutcome::Completed, output.status.code());

        Ok(CommandOutput::from_stdout(&stdout))
    }

    /// Returns the lock serializing submissions for one sender address.
    fn sender_lock(&self, sender: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .sender_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(sender.to_string()).or_default())
    }

    /// Appends an audit entry when auditing is enabled.
    fn record(
        &self,
        command: LedgerCommand,
        invocation: &str,
        correlation_id: &str,
        from_address: Option<String>,
        outcome: AuditOutcome,
        exit_code: Option<i32>,
    ) {
        let Some(audit) = &self.audit else {
            return;
        };
        let event = CommandEvent {
            correlation_id: correlation_id.to_string(),
            command: command.as_str().to_string(),
            invocation: invocation.to_string(),
            from_address,
            outcome,
            exit_code,
        };
        if let Err(e) = audit.log_command_event(event) {
            tracing::warn!(error = %e, "failed to append audit entry");
        }
    }
}
