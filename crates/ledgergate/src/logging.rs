//! Structured logging infrastructure.
//!
//! Built on the `tracing` ecosystem: env-filter levels, pretty/JSON/
//! compact output, optional non-blocking file logging, and correlation
//! ids that tie a gateway request to its subprocess invocation and audit
//! entry.
//!
//! # Quick Start
//!
//! ```no_run
//! use ledgergate::logging::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default()).expect("logging init");
//! tracing::info!("gateway starting");
//! ```

use std::path::PathBuf;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Error type for logging initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Failed to create the log file or its directory.
    #[error("failed to create log file: {0}")]
    FileCreation(String),

    /// Failed to install the tracing subscriber.
    #[error("failed to initialize logging: {0}")]
    SubscriberInit(String),

    /// The configuration is invalid.
    #[error("invalid log configuration: {0}")]
    InvalidConfig(String),
}

/// Minimum severity of messages that will be logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Verbose.
    Debug,
    /// Standard.
    #[default]
    Info,
    /// Quiet.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The string accepted by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for log messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format. Best for interactive use.
    #[default]
    Pretty,
    /// JSON structured format for log aggregation.
    Json,
    /// Single-line compact format.
    Compact,
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level; overridden by `RUST_LOG` when set.
    pub level: LogLevel,

    /// Output format.
    pub format: LogFormat,

    /// Optional log file. When set, logs are also written here through a
    /// non-blocking daily-rolling appender.
    pub file_path: Option<PathBuf>,
}

/// Guard that keeps the non-blocking file writer alive.
///
/// Hold this for the lifetime of the program; dropping it flushes
/// buffered file output.
pub struct LogGuard {
    guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

/// Maps `-v` occurrences to a [`LogLevel`].
///
/// Zero is `Warn` so that an unadorned CLI run stays quiet; the daemon
/// passes at least one level itself.
#[must_use]
pub const fn verbosity_to_level(verbose: u8) -> LogLevel {
    match verbose {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Initializes the logging system.
///
/// Respects `RUST_LOG` when present, falling back to the configured
/// level. Returns a guard that must be kept alive for file logging.
///
/// # Errors
///
/// Returns [`LogError`] when the log directory cannot be created or a
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.as_str()))
        .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

    let (file_writer, guard) = match &config.file_path {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            std::fs::create_dir_all(dir)
                .map_err(|e| LogError::FileCreation(format!("{}: {e}", dir.display())))?;
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .ok_or_else(|| LogError::InvalidConfig("invalid log file name".to_string()))?;
            let appender = tracing_appender::rolling::daily(dir, filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    let init_result = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
    };
    init_result.map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard { guard })
}

/// Generates a correlation id: 16 random bytes as 32 hex chars.
///
/// Correlation ids link a gateway request's log lines to its audit
/// entry. They are identifiers, not secrets.
#[must_use]
pub fn new_correlation_id() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}
