//! # ledgergate
//!
//! Command gateway daemon for an accounting-ledger dashboard built atop an
//! external blockchain node.
//!
//! The gateway accepts logical command names plus parameters over HTTP,
//! renders them into argument-vector invocations of the external chain
//! CLI, executes them with a timeout and bounded concurrency, and
//! normalizes the heterogeneous output shapes into a stable JSON
//! contract. It also proxies the node's read-only REST queries (groups,
//! journal entries, balances) through an explicit shape-normalization
//! step, and serves the prebuilt dashboard bundle.
//!
//! All ledger semantics live in the external node and CLI; the gateway
//! does not interpret commands beyond templating them.
//!
//! ## Modules
//!
//! - [`audit`] - HMAC-chained audit log of command invocations
//! - [`cli`] - Command-line interface (`init`, `serve`, `run`, ...)
//! - [`exec`] - Subprocess execution and output normalization
//! - [`logging`] - Structured logging infrastructure
//! - [`query`] - Read-only node REST client with shape normalization
//! - [`server`] - The axum HTTP gateway
//!
//! ## Usage
//!
//! ```bash
//! # Write the default configuration
//! ledgergate init
//!
//! # Start the gateway
//! ledgergate serve --foreground
//!
//! # One-shot invocation from the terminal
//! ledgergate run list-keys
//! ledgergate run create-group \
//!     --param name=Assets \
//!     --param "description=Cash and equivalents" \
//!     --param fromAddress=cosmos1abc
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod audit;
pub mod cli;
pub mod exec;
pub mod logging;
pub mod query;
pub mod server;
