//! Configuration types for the `ledgergate` command gateway.
//!
//! Configuration is stored in TOML format at `~/.ledgergate/config.toml`
//! and covers four sections:
//!
//! - **Server**: HTTP bind address, port, static asset directory
//! - **Chain**: the external CLI binary and its transaction flags
//! - **Node**: the read-only REST API of the blockchain node
//! - **Audit**: the tamper-evident command audit log
//!
//! Everything the source dashboard hardcoded (chain id, fee string,
//! keyring backend, node URL) is configuration here and is injected into
//! the components that need it at construction.
//!
//! # Examples
//!
//! ```
//! use ledgergate_core::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.server.port, 3001);
//! assert_eq!(config.chain.binary, "rollkit");
//!
//! // Load from TOML
//! let toml_str = r#"
//! [server]
//! port = 8080
//!
//! [chain]
//! chain_id = "ledger-devnet"
//! "#;
//! let config: Config = toml::from_str(toml_str).expect("valid TOML");
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.chain.chain_id, "ledger-devnet");
//! // Unspecified fields keep their defaults.
//! assert_eq!(config.chain.fees, "500stake");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the gateway daemon.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// External chain CLI settings.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Read-only node REST API settings.
    #[serde(default)]
    pub node: NodeConfig,

    /// Command audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0` or `127.0.0.1`.
    pub bind_addr: String,

    /// TCP port. Overridable with the `LEDGERGATE_PORT` environment
    /// variable.
    pub port: u16,

    /// Directory holding the prebuilt dashboard bundle served as static
    /// assets. Relative paths resolve against the working directory.
    pub static_dir: String,

    /// Whole-request timeout in seconds for HTTP handlers.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3001,
            static_dir: "build".to_string(),
            request_timeout_secs: 90,
        }
    }
}

/// External chain CLI configuration.
///
/// These values fill the fixed argv templates; see
/// [`crate::command::LedgerCommand::to_invocation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    /// Name or path of the chain CLI binary.
    pub binary: String,

    /// Chain identifier passed as `--chain-id`.
    pub chain_id: String,

    /// Fee string passed as `--fees`, e.g. `500stake`.
    pub fees: String,

    /// Gas setting passed as `--gas` by `send-and-record`.
    pub gas: String,

    /// Keyring backend passed to `keys list`.
    pub keyring_backend: String,

    /// Per-invocation timeout in seconds; on expiry the child process is
    /// killed and the request fails.
    pub command_timeout_secs: u64,

    /// Maximum number of concurrently running child processes.
    pub max_concurrent_commands: usize,

    /// Serialize transaction submissions sharing a `--from` address to
    /// avoid account-sequence races at the node.
    pub serialize_by_sender: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            binary: "rollkit".to_string(),
            chain_id: "erprollup".to_string(),
            fees: "500stake".to_string(),
            gas: "auto".to_string(),
            keyring_backend: "test".to_string(),
            command_timeout_secs: 60,
            max_concurrent_commands: 8,
            serialize_by_sender: true,
        }
    }
}

/// Read-only node REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NodeConfig {
    /// Base URL of the node's REST endpoint. Overridable with the
    /// `LEDGERGATE_NODE_URL` environment variable.
    pub rest_url: String,

    /// Module path prefix for ledger queries, i.e. the `<namespace>` in
    /// `<rest_url>/<namespace>/ledger/group`.
    pub api_namespace: String,

    /// Per-request timeout in seconds for node queries.
    pub request_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://127.0.0.1:1317".to_string(),
            api_namespace: "erprollup".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Command audit log configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether invocations are appended to the audit chain.
    pub enabled: bool,

    /// Directory holding `audit.jsonl` and the HMAC key file.
    pub directory: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "~/.ledgergate/audit".to_string(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a section is unusable: empty
    /// binary name, empty chain id or fee string, a zero timeout, or a
    /// zero process limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.binary.trim().is_empty() {
            return Err(ConfigError::invalid("chain.binary must not be empty"));
        }
        if self.chain.chain_id.trim().is_empty() {
            return Err(ConfigError::invalid("chain.chain_id must not be empty"));
        }
        if self.chain.fees.trim().is_empty() {
            return Err(ConfigError::invalid("chain.fees must not be empty"));
        }
        if self.chain.command_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "chain.command_timeout_secs must be at least 1",
            ));
        }
        if self.chain.max_concurrent_commands == 0 {
            return Err(ConfigError::invalid(
                "chain.max_concurrent_commands must be at least 1",
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_secs must be at least 1",
            ));
        }
        if self.node.rest_url.trim().is_empty() {
            return Err(ConfigError::invalid("node.rest_url must not be empty"));
        }
        Ok(())
    }

    /// Renders the default configuration as a commented TOML document,
    /// used by `ledgergate init`.
    #[must_use]
    pub fn default_toml() -> String {
        let defaults = Self::default();
        format!(
            r#"# ledgergate configuration

[server]
bind_addr = "{bind_addr}"
port = {port}
static_dir = "{static_dir}"
request_timeout_secs = {request_timeout}

[chain]
binary = "{binary}"
chain_id = "{chain_id}"
fees = "{fees}"
gas = "{gas}"
keyring_backend = "{keyring_backend}"
command_timeout_secs = {command_timeout}
max_concurrent_commands = {max_concurrent}
serialize_by_sender = {serialize_by_sender}

[node]
rest_url = "{rest_url}"
api_namespace = "{api_namespace}"
request_timeout_secs = {node_timeout}

[audit]
enabled = {audit_enabled}
directory = "{audit_directory}"
"#,
            bind_addr = defaults.server.bind_addr,
            port = defaults.server.port,
            static_dir = defaults.server.static_dir,
            request_timeout = defaults.server.request_timeout_secs,
            binary = defaults.chain.binary,
            chain_id = defaults.chain.chain_id,
            fees = defaults.chain.fees,
            gas = defaults.chain.gas,
            keyring_backend = defaults.chain.keyring_backend,
            command_timeout = defaults.chain.command_timeout_secs,
            max_concurrent = defaults.chain.max_concurrent_commands,
            serialize_by_sender = defaults.chain.serialize_by_sender,
            rest_url = defaults.node.rest_url,
            api_namespace = defaults.node.api_namespace,
            node_timeout = defaults.node.request_timeout_secs,
            audit_enabled = defaults.audit.enabled,
            audit_directory = defaults.audit.directory,
        )
    }
}
