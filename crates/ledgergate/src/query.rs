//! Read-only node REST client and response-shape normalization.
//!
//! The node's query endpoints answer with inconsistent shapes for the
//! same logical list: sometimes a bare array, sometimes a wrapped object
//! (`{"Group": [...]}`), sometimes a keyed map of id to body. Instead of
//! sniffing shapes dynamically, each endpoint decodes through an explicit
//! untagged enum with exhaustive cases; when no case matches, list
//! endpoints fall back to the empty list (and log the unexpected shape)
//! rather than failing the caller.
//!
//! The client takes its base URL and timeouts from an injected
//! [`NodeConfig`] at construction; nothing here is global.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ledgergate_core::config::NodeConfig;
use ledgergate_core::types::{Coin, Group, JournalEntry, KeyEntry};

/// Errors from node REST queries.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Transport-level failure: connect, timeout, or body read.
    #[error("node request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a non-success status.
    #[error("node returned HTTP {status} for {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// A detail response did not match any known shape.
    #[error("could not decode node response: {0}")]
    Decode(String),
}

/// Normalized key-listing result, the gateway's stable `/api/keys` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysResult {
    /// The normalized key entries.
    pub keys: Vec<KeyEntry>,
}

/// Read-only client for the node's REST API.
#[derive(Debug, Clone)]
pub struct NodeClient {
    base_url: String,
    namespace: String,
    http: reqwest::Client,
}

impl NodeClient {
    /// Builds a client from the node configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Http`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &NodeConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            namespace: config.api_namespace.clone(),
            http,
        })
    }

    /// Lists all groups.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failure or an error status;
    /// an unrecognized body shape yields the empty list.
    pub async fn groups(&self) -> Result<Vec<Group>, QueryError> {
        let value = self
            .get_json(format!("{}/{}/ledger/group", self.base_url, self.namespace))
            .await?;
        Ok(normalize_groups(value))
    }

    /// Fetches one group by id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Decode`] when the body matches no known
    /// shape, or [`QueryError`] on transport/status failure.
    pub async fn group(&self, id: &str) -> Result<Group, QueryError> {
        let value = self
            .get_json(format!(
                "{}/{}/ledger/group/{id}",
                self.base_url, self.namespace
            ))
            .await?;
        decode_detail::<Group>(value, "Group")
    }

    /// Lists all journal entries.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failure or an error status;
    /// an unrecognized body shape yields the empty list.
    pub async fn journal_entries(&self) -> Result<Vec<JournalEntry>, QueryError> {
        let value = self
            .get_json(format!(
                "{}/{}/ledger/journal_entry",
                self.base_url, self.namespace
            ))
            .await?;
        Ok(normalize_journal_entries(value))
    }

    /// Fetches one journal entry by id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Decode`] when the body matches no known
    /// shape, or [`QueryError`] on transport/status failure.
    pub async fn journal_entry(&self, id: &str) -> Result<JournalEntry, QueryError> {
        let value = self
            .get_json(format!(
                "{}/{}/ledger/journal_entry/{id}",
                self.base_url, self.namespace
            ))
            .await?;
        decode_detail::<JournalEntry>(value, "JournalEntry")
    }

    /// Fetches the bank balances of an address.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failure or an error status.
    pub async fn balances(&self, address: &str) -> Result<Vec<Coin>, QueryError> {
        let value = self
            .get_json(format!(
                "{}/cosmos/bank/v1beta1/balances/{address}",
                self.base_url
            ))
            .await?;
        Ok(normalize_balances(value))
    }

    /// Probes whether the node answers HTTP at all.
    ///
    /// Any response, including an error status, counts as reachable.
    pub async fn probe(&self) -> bool {
        self.http.get(&self.base_url).send().await.is_ok()
    }

    /// Issues a GET and decodes the body as JSON.
    async fn get_json(&self, url: String) -> Result<serde_json::Value, QueryError> {
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

/// The shapes a group listing arrives in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GroupListShape {
    /// `{"Group": [...], "pagination": ...}`
    Wrapped {
        #[serde(rename = "Group")]
        group: Vec<Group>,
    },
    /// A bare array.
    Bare(Vec<Group>),
    /// A keyed map of id to group body.
    Keyed(BTreeMap<String, serde_json::Value>),
}

/// Normalizes a group-listing body; unrecognized shapes become the empty
/// list.
#[must_use]
pub fn normalize_groups(value: serde_json::Value) -> Vec<Group> {
    match serde_json::from_value::<GroupListShape>(value) {
        Ok(GroupListShape::Wrapped { group }) => group,
        Ok(GroupListShape::Bare(groups)) => groups,
        Ok(GroupListShape::Keyed(map)) => map
            .into_iter()
            .filter_map(|(key, body)| {
                // Only values that look like a group participate; other
                // keys (pagination and friends) are skipped.
                let mut group: Group = serde_json::from_value(body).ok()?;
                if group.id.is_empty() {
                    group.id = key;
                }
                Some(group)
            })
            .collect(),
        Err(_) => {
            tracing::warn!("unrecognized group listing shape, returning empty list");
            Vec::new()
        }
    }
}

/// The shapes a journal-entry listing arrives in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JournalEntryListShape {
    /// `{"JournalEntry": [...], "pagination": ...}`
    Wrapped {
        #[serde(rename = "JournalEntry")]
        journal_entry: Vec<JournalEntry>,
    },
    /// A bare array.
    Bare(Vec<JournalEntry>),
}

/// Normalizes a journal-entry listing body; unrecognized shapes become
/// the empty list.
#[must_use]
pub fn normalize_journal_entries(value: serde_json::Value) -> Vec<JournalEntry> {
    match serde_json::from_value::<JournalEntryListShape>(value) {
        Ok(JournalEntryListShape::Wrapped { journal_entry }) => journal_entry,
        Ok(JournalEntryListShape::Bare(entries)) => entries,
        Err(_) => {
            tracing::warn!("unrecognized journal entry listing shape, returning empty list");
            Vec::new()
        }
    }
}

/// Balances arrive as `{"balances": [...], "pagination": ...}`.
#[derive(Debug, Deserialize)]
struct BalancesShape {
    #[serde(default)]
    balances: Vec<Coin>,
}

/// Normalizes a balances body; a missing `balances` field becomes the
/// empty list.
#[must_use]
pub fn normalize_balances(value: serde_json::Value) -> Vec<Coin> {
    match serde_json::from_value::<BalancesShape>(value) {
        Ok(shape) => shape.balances,
        Err(_) => {
            tracing::warn!("unrecognized balances shape, returning empty list");
            Vec::new()
        }
    }
}

/// The shapes a key listing arrives in from the CLI.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeysShape {
    /// Already normalized: `{"keys": [...]}`
    Wrapped { keys: Vec<KeyEntry> },
    /// A bare array of key objects, as `keys list --output json` emits.
    Bare(Vec<KeyEntry>),
    /// `{"keys": {"alice": "cosmos1...", ...}}`
    WrappedMap { keys: BTreeMap<String, String> },
    /// A flat name-to-address map.
    FlatMap(BTreeMap<String, serde_json::Value>),
}

/// Normalizes a key-listing body into the gateway's stable shape.
///
/// Unrecognized shapes become `{"keys": []}`.
#[must_use]
pub fn normalize_keys(value: serde_json::Value) -> KeysResult {
    let from_map = |map: BTreeMap<String, String>| {
        map.into_iter()
            .map(|(name, address)| KeyEntry {
                name,
                address,
                key_type: "local".to_string(),
            })
            .collect()
    };

    let keys = match serde_json::from_value::<KeysShape>(value) {
        Ok(KeysShape::Wrapped { keys } | KeysShape::Bare(keys)) => keys,
        Ok(KeysShape::WrappedMap { keys }) => from_map(keys),
        Ok(KeysShape::FlatMap(map)) => from_map(
            map.into_iter()
                .filter_map(|(name, value)| match value {
                    serde_json::Value::String(address) => Some((name, address)),
                    _ => None,
                })
                .collect(),
        ),
        Err(_) => {
            tracing::warn!("unrecognized key listing shape, returning empty list");
            Vec::new()
        }
    };
    KeysResult { keys }
}

/// Decodes a detail response that is either wrapped under `wrapper` or
/// bare.
fn decode_detail<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    wrapper: &str,
) -> Result<T, QueryError> {
    let inner = match value {
        serde_json::Value::Object(ref map) if map.contains_key(wrapper) => {
            map[wrapper].clone()
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(|e| QueryError::Decode(e.to_string()))
}
