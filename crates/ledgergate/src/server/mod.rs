//! HTTP server for the command gateway.
//!
//! ## Submodules
//!
//! - [`protocol`] - request/response body types and error mapping
//! - [`http`] - the axum router, handlers, and serve loop

pub mod http;
pub mod protocol;

pub use http::{AppState, GatewayServer, ServerError};
pub use protocol::ErrorBody;
