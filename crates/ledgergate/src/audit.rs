//! Tamper-evident audit logging for command invocations.
//!
//! Three of the four gateway commands submit real, fee-paying
//! transactions with `-y` (no interactive confirmation). Every invocation
//! that reaches the executor is therefore appended to an HMAC-SHA256
//! chained JSONL log: each entry's HMAC covers the entry data plus the
//! previous entry's HMAC, so modifying any historical entry invalidates
//! every entry after it.
//!
//! The log rotates when it exceeds a size threshold; rotated files are
//! gzip-compressed. Each rotated segment restarts the chain from the
//! initial HMAC and is independently verifiable.
//!
//! # Example
//!
//! ```no_run
//! use ledgergate::audit::{AuditOutcome, CommandAuditLogger, CommandEvent};
//! use std::path::Path;
//!
//! let logger = CommandAuditLogger::open_or_init(Path::new("/var/log/ledgergate"))
//!     .expect("audit logger");
//!
//! logger.log_command_event(CommandEvent {
//!     correlation_id: "c0ffee".to_string(),
//!     command: "create-group".to_string(),
//!     invocation: "rollkit tx ledger create-group Assets ...".to_string(),
//!     from_address: Some("cosmos1abc".to_string()),
//!     outcome: AuditOutcome::Completed,
//!     exit_code: Some(0),
//! }).expect("append entry");
//!
//! let result = logger.verify_chain().expect("verification ran");
//! assert!(result.valid);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Name of the active audit log file.
const AUDIT_LOG_FILENAME: &str = "audit.jsonl";

/// Name of the HMAC key file.
const AUDIT_KEY_FILENAME: &str = "audit.key";

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// HMAC key length in bytes.
const KEY_LEN: usize = 32;

/// Previous-HMAC value for the first entry of a chain segment.
const INITIAL_HMAC: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Errors from audit log operations.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// An I/O failure while touching the audit directory or files.
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key file exists but does not hold a valid 32-byte hex key.
    #[error("invalid audit key: {0}")]
    InvalidKey(String),

    /// An entry could not be serialized or parsed.
    #[error("audit entry serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The internal state lock was poisoned by a panicking thread.
    #[error("audit state lock poisoned")]
    Lock,

    /// Rotating the log file failed.
    #[error("audit log rotation failed: {0}")]
    RotationFailed(String),
}

/// How a command invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The process exited with status zero.
    Completed,
    /// The process exited with a non-zero status or could not be run.
    Failed,
    /// The process was killed after exceeding the command timeout.
    Timeout,
}

impl AuditOutcome {
    /// The string stored in audit entries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Timeout => "timeout",
        }
    }
}

/// Input describing one command invocation to be recorded.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    /// Correlation id linking the entry to request logs.
    pub correlation_id: String,
    /// Canonical command name, e.g. `create-group`.
    pub command: String,
    /// Display form of the rendered invocation.
    pub invocation: String,
    /// The submitting address, when the command carries one.
    pub from_address: Option<String>,
    /// How the invocation ended.
    pub outcome: AuditOutcome,
    /// Process exit code, when the process ran to completion.
    pub exit_code: Option<i32>,
}

/// One line of the JSONL audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    /// Monotonically increasing sequence number.
    pub seq: u64,
    /// ISO 8601 timestamp.
    pub timestamp: String,
    /// Correlation id from the originating request.
    pub correlation_id: String,
    /// Canonical command name.
    pub command: String,
    /// Display form of the rendered invocation.
    pub invocation: String,
    /// Submitting address, when present.
    pub from_address: Option<String>,
    /// `completed`, `failed`, or `timeout`.
    pub outcome: String,
    /// Process exit code, when known.
    pub exit_code: Option<i32>,
    /// HMAC-SHA256 over this entry's payload and the previous HMAC.
    pub hmac: String,
}

impl AuditEntry {
    /// Canonical byte payload covered by the HMAC.
    ///
    /// Field order is fixed; changing it invalidates existing chains.
    fn hmac_payload(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.seq,
            self.timestamp,
            self.correlation_id,
            self.command,
            self.invocation,
            self.from_address.as_deref().unwrap_or(""),
            self.outcome,
            self.exit_code.map_or(String::new(), |c| c.to_string()),
        )
    }
}

/// Result of verifying the active audit chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether every entry's HMAC checked out.
    pub valid: bool,
    /// Number of entries examined.
    pub entries: u64,
    /// Sequence number of the first invalid entry, when any.
    pub first_invalid_seq: Option<u64>,
}

/// Mutable chain state, guarded by a mutex for concurrent logging.
struct ChainState {
    seq: u64,
    prev_hmac: String,
    file_size: u64,
}

/// Appends HMAC-chained entries describing command invocations.
///
/// Thread-safe: multiple request handlers may log concurrently.
pub struct CommandAuditLogger {
    dir: PathBuf,
    key: [u8; KEY_LEN],
    state: Mutex<ChainState>,
    max_file_size: u64,
}

impl std::fmt::Debug for CommandAuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAuditLogger")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl CommandAuditLogger {
    /// Opens the audit log in `dir`, creating the directory, key, and log
    /// file as needed. An existing key and log are reused so the chain
    /// continues across restarts.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the directory cannot be created, the
    /// key file is unreadable or malformed, or the existing log cannot be
    /// scanned.
    pub fn open_or_init(dir: &Path) -> Result<Self, AuditError> {
        fs::create_dir_all(dir)?;
        let key = load_or_generate_key(&dir.join(AUDIT_KEY_FILENAME))?;
        Self::with_key(dir, &key)
    }

    /// Opens the audit log with an explicit 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidKey`] for a wrong-sized key, or an
    /// I/O error when the existing log cannot be scanned.
    pub fn with_key(dir: &Path, key: &[u8]) -> Result<Self, AuditError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| AuditError::InvalidKey(format!("expected {KEY_LEN} bytes")))?;
        fs::create_dir_all(dir)?;

        let log_path = dir.join(AUDIT_LOG_FILENAME);
        let state = scan_existing_log(&log_path)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            key,
            state: Mutex::new(state),
            max_file_size: MAX_FILE_SIZE,
        })
    }

    /// Path of the active log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(AUDIT_LOG_FILENAME)
    }

    /// Appends an entry for the given event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the entry cannot be serialized or
    /// written, or when rotation fails.
    pub fn log_command_event(&self, event: CommandEvent) -> Result<(), AuditError> {
        let mut state = self.state.lock().map_err(|_| AuditError::Lock)?;

        let mut entry = AuditEntry {
            seq: state.seq,
            timestamp: Utc::now().to_rfc3339(),
            correlation_id: event.correlation_id,
            command: event.command,
            invocation: event.invocation,
            from_address: event.from_address,
            outcome: event.outcome.as_str().to_string(),
            exit_code: event.exit_code,
            hmac: String::new(),
        };
        entry.hmac = self.compute_hmac(&entry, &state.prev_hmac);

        let line = serde_json::to_string(&entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;

        state.seq += 1;
        state.prev_hmac = entry.hmac;
        state.file_size += line.len() as u64 + 1;

        if state.file_size >= self.max_file_size {
            self.rotate(&mut state)?;
        }
        Ok(())
    }

    /// Verifies the active log file's HMAC chain.
    ///
    /// Rotated segments restart from the initial HMAC, so the active file
    /// is always verifiable on its own.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the log cannot be read or an entry is
    /// not valid JSON.
    pub fn verify_chain(&self) -> Result<VerificationResult, AuditError> {
        let path = self.log_path();
        if !path.exists() {
            return Ok(VerificationResult {
                valid: true,
                entries: 0,
                first_invalid_seq: None,
            });
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut prev_hmac = INITIAL_HMAC.to_string();
        let mut entries = 0u64;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line)?;
            let expected = self.compute_hmac(&entry, &prev_hmac);
            if expected != entry.hmac {
                return Ok(VerificationResult {
                    valid: false,
                    entries,
                    first_invalid_seq: Some(entry.seq),
                });
            }
            prev_hmac = entry.hmac;
            entries += 1;
        }

        Ok(VerificationResult {
            valid: true,
            entries,
            first_invalid_seq: None,
        })
    }

    /// Computes the chained HMAC for an entry.
    fn compute_hmac(&self, entry: &AuditEntry, prev_hmac: &str) -> String {
        // HmacSha256::new_from_slice accepts any key length; KEY_LEN is
        // enforced at construction.
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
        mac.update(entry.hmac_payload().as_bytes());
        mac.update(prev_hmac.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Rotates the active log: gzip-compress it under a timestamped name
    /// and restart the chain in a fresh file.
    fn rotate(&self, state: &mut ChainState) -> Result<(), AuditError> {
        let active = self.log_path();
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let rotated = self
            .dir
            .join(format!("audit-{stamp}-{}.jsonl.gz", state.seq));

        let mut input = File::open(&active)?;
        let mut contents = Vec::new();
        input.read_to_end(&mut contents)?;

        let out = File::create(&rotated)
            .map_err(|e| AuditError::RotationFailed(format!("{}: {e}", rotated.display())))?;
        let mut encoder = GzEncoder::new(out, Compression::default());
        encoder.write_all(&contents)?;
        encoder
            .finish()
            .map_err(|e| AuditError::RotationFailed(e.to_string()))?;

        fs::remove_file(&active)?;

        // Fresh segment: the chain restarts so each file verifies alone.
        state.prev_hmac = INITIAL_HMAC.to_string();
        state.file_size = 0;

        tracing::info!(rotated = %rotated.display(), "audit log rotated");
        Ok(())
    }

    /// Overrides the rotation threshold; used by tests.
    #[cfg(test)]
    fn set_max_file_size(&mut self, bytes: u64) {
        self.max_file_size = bytes;
    }
}

/// Loads the HMAC key from `path`, generating and persisting a random key
/// on first use.
fn load_or_generate_key(path: &Path) -> Result<[u8; KEY_LEN], AuditError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let bytes = hex::decode(content.trim())
            .map_err(|e| AuditError::InvalidKey(e.to_string()))?;
        return bytes
            .try_into()
            .map_err(|_| AuditError::InvalidKey(format!("expected {KEY_LEN} bytes")));
    }

    let key: [u8; KEY_LEN] = rand::random();
    fs::write(path, hex::encode(key))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(key)
}

/// Scans an existing log to recover the chain tail.
fn scan_existing_log(path: &Path) -> Result<ChainState, AuditError> {
    if !path.exists() {
        return Ok(ChainState {
            seq: 0,
            prev_hmac: INITIAL_HMAC.to_string(),
            file_size: 0,
        });
    }

    let file_size = fs::metadata(path)?.len();
    let reader = BufReader::new(File::open(path)?);
    let mut last: Option<AuditEntry> = None;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        last = Some(serde_json::from_str(&line)?);
    }

    Ok(match last {
        Some(entry) => ChainState {
            seq: entry.seq + 1,
            prev_hmac: entry.hmac,
            file_size,
        },
        None => ChainState {
            seq: 0,
            prev_hmac: INITIAL_HMAC.to_string(),
            file_size: 0,
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    fn event(correlation_id: &str, outcome: AuditOutcome) -> CommandEvent {
        CommandEvent {
            correlation_id: correlation_id.to_string(),
            command: "create-group".to_string(),
            invocation: "rollkit tx ledger create-group Assets Cash --from cosmos1abc"
                .to_string(),
            from_address: Some("cosmos1abc".to_string()),
            outcome,
            exit_code: Some(0),
        }
    }

    #[test]
    fn test_log_and_verify() {
        let dir = TempDir::new().expect("tempdir");
        let logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        for i in 0..5 {
            logger
                .log_command_event(event(&format!("req-{i}"), AuditOutcome::Completed))
                .expect("log");
        }
        let result = logger.verify_chain().expect("verify");
        assert!(result.valid);
        assert_eq!(result.entries, 5);
        assert!(result.first_invalid_seq.is_none());
    }

    #[test]
    fn test_empty_log_verifies() {
        let dir = TempDir::new().expect("tempdir");
        let logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        let result = logger.verify_chain().expect("verify");
        assert!(result.valid);
        assert_eq!(result.entries, 0);
    }

    #[test]
    fn test_tampering_detected() {
        let dir = TempDir::new().expect("tempdir");
        let logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        for i in 0..3 {
            logger
                .log_command_event(event(&format!("req-{i}"), AuditOutcome::Completed))
                .expect("log");
        }

        // Flip the invocation recorded in the second entry.
        let path = logger.log_path();
        let content = fs::read_to_string(&path).expect("read");
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        let mut entry: AuditEntry = serde_json::from_str(&lines[1]).expect("parse");
        entry.invocation = "rollkit tx ledger create-group Liabilities x".to_string();
        lines[1] = serde_json::to_string(&entry).expect("serialize");
        fs::write(&path, lines.join("\n") + "\n").expect("write");

        let result = logger.verify_chain().expect("verify");
        assert!(!result.valid);
        assert_eq!(result.first_invalid_seq, Some(1));
    }

    #[test]
    fn test_truncating_tail_still_verifies_prefix() {
        // The chain detects modification, not truncation of the tail;
        // sequence numbers expose missing entries to an external reader.
        let dir = TempDir::new().expect("tempdir");
        let logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        for i in 0..3 {
            logger
                .log_command_event(event(&format!("req-{i}"), AuditOutcome::Completed))
                .expect("log");
        }
        let path = logger.log_path();
        let content = fs::read_to_string(&path).expect("read");
        let prefix: Vec<&str> = content.lines().take(2).collect();
        fs::write(&path, prefix.join("\n") + "\n").expect("write");

        let result = logger.verify_chain().expect("verify");
        assert!(result.valid);
        assert_eq!(result.entries, 2);
    }

    #[test]
    fn test_chain_continues_across_reopen() {
        let dir = TempDir::new().expect("tempdir");
        {
            let logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
            logger
                .log_command_event(event("req-0", AuditOutcome::Completed))
                .expect("log");
        }
        let logger = CommandAuditLogger::open_or_init(dir.path()).expect("reopen");
        logger
            .log_command_event(event("req-1", AuditOutcome::Failed))
            .expect("log");

        let result = logger.verify_chain().expect("verify");
        assert!(result.valid);
        assert_eq!(result.entries, 2);
    }

    #[test]
    fn test_rotation_compresses_and_restarts_chain() {
        let dir = TempDir::new().expect("tempdir");
        let mut logger = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        logger.set_max_file_size(1); // rotate after every entry

        logger
            .log_command_event(event("req-0", AuditOutcome::Completed))
            .expect("log");
        logger
            .log_command_event(event("req-1", AuditOutcome::Completed))
            .expect("log");

        let gz_count = fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".jsonl.gz"))
            .count();
        assert_eq!(gz_count, 2);

        // Post-rotation segment verifies on its own.
        logger
            .log_command_event(event("req-2", AuditOutcome::Timeout))
            .expect("log");
        let result = logger.verify_chain().expect("verify");
        assert!(result.valid);
    }

    #[test]
    fn test_key_persisted_and_reused() {
        let dir = TempDir::new().expect("tempdir");
        let key_path = dir.path().join(AUDIT_KEY_FILENAME);
        let _first = CommandAuditLogger::open_or_init(dir.path()).expect("open");
        let key_hex = fs::read_to_string(&key_path).expect("key written");
        let _second = CommandAuditLogger::open_or_init(dir.path()).expect("reopen");
        assert_eq!(fs::read_to_string(&key_path).expect("key"), key_hex);
        assert_eq!(hex::decode(key_hex.trim()).expect("hex").len(), KEY_LEN);
    }

    #[test]
    fn test_rejects_wrong_size_key() {
        let dir = TempDir::new().expect("tempdir");
        let err = CommandAuditLogger::with_key(dir.path(), &[0u8; 16])
            .expect_err("short key rejected");
        assert!(matches!(err, AuditError::InvalidKey(_)));
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(AuditOutcome::Completed.as_str(), "completed");
        assert_eq!(AuditOutcome::Failed.as_str(), "failed");
        assert_eq!(AuditOutcome::Timeout.as_str(), "timeout");
    }
}
