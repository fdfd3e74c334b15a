//! The recognized ledger commands and their argv templates.
//!
//! Each logical command maps to a fixed positional/flag template of the
//! external chain CLI. Rendering substitutes parameters into an argument
//! *vector* that is handed to the process spawner verbatim, with no shell
//! in between: a parameter value containing quotes, semicolons, backticks,
//! or `$()` is a single inert argv element and can never alter which
//! program runs.
//!
//! Three of the four commands submit real, fee-paying transactions with
//! `-y` (auto-confirm, no interactive step). Callers surface that risk:
//! the executor logs and audits every submission.

use std::str::FromStr;

use serde::Serialize;

use crate::config::ChainConfig;
use crate::error::CommandError;
use crate::types::ParamMap;

/// A rendered subprocess invocation: program plus argument vector.
///
/// Derived per request and discarded after execution; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInvocation {
    /// The program to execute (the configured chain CLI binary).
    pub program: String,
    /// Arguments, one element per argv slot.
    pub args: Vec<String>,
}

impl CommandInvocation {
    /// Renders the invocation for display and audit entries.
    ///
    /// This is a *display* form only; execution always uses the vector.
    #[must_use]
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.chars().any(char::is_whitespace) || arg.is_empty() {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// The fixed set of commands the gateway will proxy.
///
/// Any other name fails with [`CommandError::UnknownCommand`] before any
/// subprocess is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerCommand {
    /// List the keys in the configured keyring. Read-only.
    ListKeys,
    /// Create an accounting group. Submits a transaction.
    CreateGroup,
    /// Create a journal entry. Submits a transaction.
    CreateJournalEntry,
    /// Transfer coins and record the matching journal entry in one
    /// transaction. Submits a transaction.
    SendAndRecord,
}

/// Error returned when parsing an unknown command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError {
    /// The unrecognized command name.
    pub name: String,
}

impl std::fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown command: {}", self.name)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for LedgerCommand {
    type Err = ParseCommandError;

    /// Parses a command name.
    ///
    /// Accepts the kebab-case canonical names and the camelCase aliases
    /// sent by the legacy dashboard client.
    ///
    /// # Errors
    ///
    /// Returns [`ParseCommandError`] for any other name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list-keys" | "getKeys" => Ok(Self::ListKeys),
            "create-group" | "createGroup" => Ok(Self::CreateGroup),
            "create-journal-entry" | "createJournalEntry" => Ok(Self::CreateJournalEntry),
            "send-and-record" | "sendAndRecord" => Ok(Self::SendAndRecord),
            _ => Err(ParseCommandError {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for LedgerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LedgerCommand {
    /// Returns the canonical kebab-case command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListKeys => "list-keys",
            Self::CreateGroup => "create-group",
            Self::CreateJournalEntry => "create-journal-entry",
            Self::SendAndRecord => "send-and-record",
        }
    }

    /// Whether this command submits a fee-paying, auto-confirmed
    /// transaction to the chain.
    #[must_use]
    pub const fn submits_transaction(self) -> bool {
        !matches!(self, Self::ListKeys)
    }

    /// The parameters this command requires, in template order.
    #[must_use]
    pub const fn required_params(self) -> &'static [&'static str] {
        match self {
            Self::ListKeys => &[],
            Self::CreateGroup => &["name", "description", "fromAddress"],
            Self::CreateJournalEntry => &[
                "description",
                "debitGroup",
                "creditGroup",
                "amount",
                "sender",
                "receiver",
                "fromAddress",
            ],
            Self::SendAndRecord => &[
                "receiverAddress",
                "amount",
                "denom",
                "debitGroupId",
                "creditGroupId",
                "description",
                "fromAddress",
            ],
        }
    }

    /// Renders this command into an argument vector.
    ///
    /// Every required parameter must be present and non-empty, and
    /// `amount` must parse as an unsigned integer. Validation happens
    /// here so that a malformed request never reaches process execution.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingParam`] for an absent or empty
    /// required parameter, or [`CommandError::InvalidParam`] when a value
    /// fails validation.
    pub fn to_invocation(
        self,
        params: &ParamMap,
        chain: &ChainConfig,
    ) -> Result<CommandInvocation, CommandError> {
        let get = |param: &'static str| -> Result<String, CommandError> {
            let value = params
                .get(param)
                .map(crate::types::ParamValue::render)
                .unwrap_or_default();
            if value.is_empty() {
                return Err(CommandError::MissingParam {
                    command: self.as_str(),
                    param,
                });
            }
            Ok(value)
        };

        let get_amount = |param: &'static str| -> Result<String, CommandError> {
            let value = get(param)?;
            if value.parse::<u128>().is_err() {
                return Err(CommandError::InvalidParam {
                    param,
                    reason: format!("'{value}' is not an unsigned integer"),
                });
            }
            Ok(value)
        };

        let args = match self {
            Self::ListKeys => vec![
                "keys".to_string(),
                "list".to_string(),
                "--keyring-backend".to_string(),
                chain.keyring_backend.clone(),
                "--output".to_string(),
                "json".to_string(),
            ],
            Self::CreateGroup => vec![
                "tx".to_string(),
                "ledger".to_string(),
                "create-group".to_string(),
                get("name")?,
                get("description")?,
                "--from".to_string(),
                get("fromAddress")?,
                "--chain-id".to_string(),
                chain.chain_id.clone(),
                "-y".to_string(),
                "--fees".to_string(),
                chain.fees.clone(),
                "--output".to_string(),
                "json".to_string(),
            ],
            Self::CreateJournalEntry => vec![
                "tx".to_string(),
                "ledger".to_string(),
                "create-journal-entry".to_string(),
                get("description")?,
                get("debitGroup")?,
                get("creditGroup")?,
                get_amount("amount")?,
                get("sender")?,
                get("receiver")?,
                "--from".to_string(),
                get("fromAddress")?,
                "--chain-id".to_string(),
                chain.chain_id.clone(),
                "-y".to_string(),
                "--fees".to_string(),
                chain.fees.clone(),
                "--output".to_string(),
                "json".to_string(),
            ],
            Self::SendAndRecord => vec![
                "tx".to_string(),
                "ledger".to_string(),
                "send-and-record".to_string(),
                get("receiverAddress")?,
                get_amount("amount")?,
                get("denom")?,
                get("debitGroupId")?,
                get("creditGroupId")?,
                get("description")?,
                "--from".to_string(),
                get("fromAddress")?,
                "--chain-id".to_string(),
                chain.chain_id.clone(),
                "--gas".to_string(),
                chain.gas.clone(),
                "--fees".to_string(),
                chain.fees.clone(),
                "-y".to_string(),
                "--output".to_string(),
                "json".to_string(),
            ],
        };

        Ok(CommandInvocation {
            program: chain.binary.clone(),
            args,
        })
    }
}
