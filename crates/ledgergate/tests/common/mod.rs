//! Shared test utilities and helpers for integration tests.
//!
//! ## Functions
//!
//! - [`write_stub_cli`] - write an executable shell stub standing in for
//!   the chain CLI
//! - [`spawn_gateway`] - run a gateway on an ephemeral port against a
//!   stub CLI

#![allow(dead_code)]
// Panicking on setup failures is acceptable in test utilities.
#![allow(clippy::expect_used)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use ledgergate::exec::CommandExecutor;
use ledgergate::query::NodeClient;
use ledgergate::server::GatewayServer;
use ledgergate_core::config::Config;

/// Writes an executable shell stub standing in for the chain CLI.
///
/// The returned path is absolute and ready to use as `chain.binary`.
#[cfg(unix)]
pub fn write_stub_cli(dir: &Path, name: &str, script: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).expect("write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod stub");
    path.to_string_lossy().into_owned()
}

/// A stub that prints each argv element on its own line.
///
/// The gateway wraps the non-JSON output as `{"output": ...}`, so tests
/// can observe the exact argument boundaries the child process saw.
pub const ARGV_ECHO: &str = "for a in \"$@\"; do printf '%s\\n' \"$a\"; done";

/// A gateway configuration wired to a stub CLI binary.
///
/// The HTTP port is unused (tests bind their own listener); the node
/// REST URL points nowhere reachable.
pub fn stub_config(binary: String) -> Config {
    let mut config = Config::default();
    config.chain.binary = binary;
    config.chain.command_timeout_secs = 5;
    config.node.rest_url = "http://127.0.0.1:1".to_string();
    config.node.request_timeout_secs = 1;
    config
}

/// Handle to a gateway running on an ephemeral port.
pub struct RunningGateway {
    /// The bound address, e.g. `127.0.0.1:49201`.
    pub addr: SocketAddr,
    /// Fires the graceful shutdown.
    pub shutdown: oneshot::Sender<()>,
    /// The serve task.
    pub handle: JoinHandle<()>,
}

impl RunningGateway {
    /// Base URL of the running gateway.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Shuts the gateway down and waits for the serve task.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

/// Spawns a gateway for the given configuration on an ephemeral port.
pub async fn spawn_gateway(config: Config) -> RunningGateway {
    let executor = Arc::new(CommandExecutor::new(config.chain.clone(), None));
    let node = Arc::new(NodeClient::new(&config.node).expect("node client"));
    let server = GatewayServer::new(config, executor, node);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(async move {
        server
            .serve_on(listener, shutdown_rx)
            .await
            .expect("gateway serves");
    });

    RunningGateway {
        addr,
        shutdown: shutdown_tx,
        handle,
    }
}
