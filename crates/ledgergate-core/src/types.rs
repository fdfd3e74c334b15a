//! Request/response data types and query DTOs.
//!
//! These are pass-through data carriers: the gateway enforces no ledger
//! invariants on them (double-entry rules, balances, and signing all live
//! in the external node). What the gateway does guarantee is the *shape*
//! of its own HTTP contract, which these types pin down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single parameter value in a gateway request.
///
/// The legacy dashboard client sends most parameters as strings but
/// amounts as JSON numbers, so both are accepted and rendered to a string
/// when the argument vector is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A string parameter.
    String(String),
    /// A numeric parameter.
    Number(serde_json::Number),
}

impl ParamValue {
    /// Renders the value as the string that will become one argv element.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

/// Parameter map for a gateway request, keyed by parameter name.
///
/// A `BTreeMap` keeps iteration (and therefore logs and audit entries)
/// deterministic.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Body of a `POST /api/cli` request.
///
/// Constructed per HTTP call and discarded after the response; the
/// gateway is stateless between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliRequest {
    /// Logical command name (kebab-case or the legacy camelCase alias).
    pub command: String,

    /// Command parameters; missing keys surface as `MissingParam` errors
    /// during rendering.
    #[serde(default)]
    pub params: ParamMap,
}

/// Normalized result of a successful CLI invocation.
///
/// If the subprocess's stdout is valid JSON the parsed structure is
/// returned verbatim; otherwise the raw text is wrapped as
/// `{"output": <text>}`. Non-JSON output is *not* an error: it degrades
/// to the raw wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    /// stdout parsed as JSON, returned unchanged.
    Json(serde_json::Value),
    /// stdout was not JSON; wrapped as `{"output": <text>}`.
    Raw {
        /// The raw stdout text, including any trailing newline.
        output: String,
    },
}

impl CommandOutput {
    /// Normalizes captured stdout into a [`CommandOutput`].
    #[must_use]
    pub fn from_stdout(stdout: &str) -> Self {
        match serde_json::from_str(stdout) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw {
                output: stdout.to_string(),
            },
        }
    }

    /// Converts into a plain [`serde_json::Value`] for the HTTP body.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Self::Json(value) => value,
            Self::Raw { output } => serde_json::json!({ "output": output }),
        }
    }
}

/// One key as reported by `keys list`, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Key name in the keyring.
    pub name: String,
    /// Bech32 account address.
    pub address: String,
    /// Keyring entry type; the CLI reports `local` for test-backend keys.
    #[serde(rename = "type", default = "default_key_type")]
    pub key_type: String,
}

fn default_key_type() -> String {
    "local".to_string()
}

/// An accounting group as stored on chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// On-chain identifier. Empty when the node omits it (keyed-map
    /// responses carry the id as the map key instead).
    #[serde(default)]
    pub id: String,
    /// Group name, e.g. "Assets".
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Address that created the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Fields this gateway does not interpret, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A journal entry as stored on chain.
///
/// Carries the superset of fields across client revisions: `sender` and
/// `receiver` are optional because entries created by older clients omit
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// On-chain identifier.
    #[serde(default)]
    pub id: String,
    /// Free-text description.
    pub description: String,
    /// Group debited by this entry.
    #[serde(default)]
    pub debit_group: String,
    /// Group credited by this entry.
    #[serde(default)]
    pub credit_group: String,
    /// Amount, as a string to preserve precision.
    #[serde(default)]
    pub amount: serde_json::Value,
    /// Sending party, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Receiving party, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Address that created the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Fields this gateway does not interpret, passed through verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A coin balance from the bank query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. "stake".
    pub denom: String,
    /// Amount as a decimal string.
    pub amount: String,
}
