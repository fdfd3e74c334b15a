//! Full-stack gateway tests: HTTP request in, stub subprocess out.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::{json, Value};
use tempfile::TempDir;

use crate::common::{spawn_gateway, stub_config, write_stub_cli, ARGV_ECHO};

/// The documented end-to-end scenario: a `createGroup` request renders a
/// transaction submission with `-y --fees 500stake --output json` and
/// returns the parsed receipt on success.
#[tokio::test]
async fn test_create_group_returns_parsed_receipt() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(
        dir.path(),
        "cli",
        r#"echo '{"txhash":"4E2B0C","code":0,"raw_log":"[]"}'"#,
    );
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({
            "command": "createGroup",
            "params": {
                "name": "Assets",
                "description": "Cash and equivalents",
                "fromAddress": "cosmos1abc"
            }
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({"txhash": "4E2B0C", "code": 0, "raw_log": "[]"}));

    gateway.stop().await;
}

/// The rendered argv carries the documented template, in order, with the
/// transaction flags.
#[tokio::test]
async fn test_create_group_renders_documented_template() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", ARGV_ECHO);
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({
            "command": "createGroup",
            "params": {
                "name": "Assets",
                "description": "Cash and equivalents",
                "fromAddress": "cosmos1abc"
            }
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    let args: Vec<&str> = body["output"].as_str().expect("argv echo").lines().collect();
    assert_eq!(
        args,
        [
            "tx",
            "ledger",
            "create-group",
            "Assets",
            "Cash and equivalents",
            "--from",
            "cosmos1abc",
            "--chain-id",
            "erprollup",
            "-y",
            "--fees",
            "500stake",
            "--output",
            "json"
        ]
    );

    gateway.stop().await;
}

/// An unrecognized command name yields the legacy 400 body and never
/// reaches the CLI.
#[tokio::test]
async fn test_unknown_command_rejected_without_execution() {
    let dir = TempDir::new().expect("tempdir");
    let marker = dir.path().join("ran");
    let stub = write_stub_cli(
        dir.path(),
        "cli",
        &format!("touch {}", marker.display()),
    );
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({"command": "formatDisk", "params": {}}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({"error": "Invalid command"}));
    assert!(!marker.exists(), "the CLI must not run for unknown commands");

    gateway.stop().await;
}

/// A missing required parameter is a 400, also without execution.
#[tokio::test]
async fn test_missing_parameter_is_client_error() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", "echo ok");
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({
            "command": "createGroup",
            "params": {"name": "Assets"}
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json body");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("description"));

    gateway.stop().await;
}

/// A failing CLI yields a 500 carrying the message and captured stderr.
#[tokio::test]
async fn test_cli_failure_surfaces_stderr() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(
        dir.path(),
        "cli",
        "echo 'partial output'\necho 'insufficient fees; got 0stake' >&2\nexit 13",
    );
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({"command": "getKeys", "params": {}}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.expect("json body");
    assert!(body["error"].as_str().expect("message").contains("13"));
    assert!(body["stderr"]
        .as_str()
        .expect("stderr")
        .contains("insufficient fees"));

    gateway.stop().await;
}

/// Non-JSON stdout on success degrades to the `{"output": ...}` wrapper.
#[tokio::test]
async fn test_plain_text_output_wrapped() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", "echo done");
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({"command": "getKeys", "params": {}}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body, json!({"output": "done\n"}));

    gateway.stop().await;
}

/// The injection scenario from the legacy implementation: a hostile
/// group name crosses the HTTP boundary and still arrives at the child
/// as exactly one argument.
#[tokio::test]
async fn test_hostile_parameter_cannot_break_out_of_its_argv_slot() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", ARGV_ECHO);
    let gateway = spawn_gateway(stub_config(stub)).await;

    let hostile = "a\"; rm -rf /; echo \"b";
    let response = reqwest::Client::new()
        .post(gateway.url("/api/cli"))
        .json(&json!({
            "command": "createGroup",
            "params": {
                "name": hostile,
                "description": "Cash",
                "fromAddress": "cosmos1abc"
            }
        }))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    let args: Vec<&str> = body["output"].as_str().expect("argv echo").lines().collect();
    assert_eq!(args[3], hostile);
    assert_eq!(args.iter().filter(|a| **a == hostile).count(), 1);

    gateway.stop().await;
}

/// Listing keys twice against unchanged state gives identical results.
#[tokio::test]
async fn test_list_keys_is_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(
        dir.path(),
        "cli",
        r#"echo '[{"name":"alice","address":"cosmos1abc","type":"local"}]'"#,
    );
    let gateway = spawn_gateway(stub_config(stub)).await;
    let client = reqwest::Client::new();

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(gateway.url("/api/cli"))
            .json(&json!({"command": "getKeys", "params": {}}))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), 200);
        bodies.push(response.json::<Value>().await.expect("json body"));
    }
    assert_eq!(bodies[0], bodies[1]);

    gateway.stop().await;
}

/// `/api/keys` normalizes the CLI's bare array into `{"keys": [...]}`.
#[tokio::test]
async fn test_keys_endpoint_normalizes_shape() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(
        dir.path(),
        "cli",
        r#"echo '[{"name":"alice","address":"cosmos1abc","type":"local"}]'"#,
    );
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .get(gateway.url("/api/keys"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(
        body,
        json!({"keys": [{"name": "alice", "address": "cosmos1abc", "type": "local"}]})
    );

    gateway.stop().await;
}

/// The health endpoint answers without touching CLI or node.
#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", "exit 1");
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .get(gateway.url("/health"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["status"], "ok");

    gateway.stop().await;
}

/// Read-through endpoints report the unreachable node as a 502, not a
/// gateway crash.
#[tokio::test]
async fn test_unreachable_node_is_bad_gateway() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", "echo ok");
    let gateway = spawn_gateway(stub_config(stub)).await;

    let response = reqwest::Client::new()
        .get(gateway.url("/api/groups"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 502);

    // The gateway survives and keeps answering.
    let health = reqwest::Client::new()
        .get(gateway.url("/health"))
        .send()
        .await
        .expect("request");
    assert_eq!(health.status(), 200);

    gateway.stop().await;
}

/// Static assets from the configured directory are served as the
/// fallback.
#[tokio::test]
async fn test_static_bundle_served() {
    let dir = TempDir::new().expect("tempdir");
    let stub = write_stub_cli(dir.path(), "cli", "echo ok");
    let static_dir = dir.path().join("build");
    std::fs::create_dir_all(&static_dir).expect("mkdir");
    std::fs::write(static_dir.join("index.html"), "<html>ledger</html>").expect("write");

    let mut config = stub_config(stub);
    config.server.static_dir = static_dir.to_string_lossy().into_owned();
    let gateway = spawn_gateway(config).await;

    let response = reqwest::Client::new()
        .get(gateway.url("/index.html"))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "<html>ledger</html>");

    gateway.stop().await;
}
