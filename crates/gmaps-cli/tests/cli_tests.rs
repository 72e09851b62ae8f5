//! Integration tests for the gmaps-cli binary.
//!
//! These tests use `assert_cmd` to verify subcommand output and exit codes.

use assert_cmd::Command;
use gmaps_lib::test_utils::{StubResponse, StubServer};
use predicates::prelude::*;
use serde_json::{json, Value};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("gmaps-cli").expect("binary exists");
    cmd.env_remove("RUST_LOG").env_remove("GOOGLE_MAPS_GEOCODE_URL");
    cmd
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("call"));
}

#[test]
fn tools_prints_registry_without_key() {
    let output = cli()
        .env_remove("GOOGLE_MAPS_API_KEY")
        .arg("tools")
        .output()
        .expect("run gmaps-cli tools");
    assert!(output.status.success());

    let tools: Value = serde_json::from_slice(&output.stdout).expect("registry is JSON");
    let tools = tools.as_array().expect("registry is an array");
    assert_eq!(tools.len(), 7);
    assert_eq!(tools[0]["name"], "maps_geocode");
    assert_eq!(tools[6]["name"], "maps_directions");
}

#[test]
fn unknown_tool_exits_non_zero() {
    cli()
        .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
        .args(["call", "maps_nonexistent"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown tool: maps_nonexistent"));
}

#[test]
fn invalid_arguments_exit_non_zero() {
    cli()
        .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
        .args(["call", "maps_elevation", "--args", r#"{"locations": []}"#])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "Invalid arguments for maps_elevation:",
        ));
}

#[test]
fn malformed_args_are_rejected() {
    cli()
        .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
        .args(["call", "maps_geocode", "--args", "{address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--args must be a valid JSON object"));
}

#[test]
fn call_requires_api_key() {
    cli()
        .env_remove("GOOGLE_MAPS_API_KEY")
        .args(["call", "maps_geocode", "--args", r#"{"address": "Paris"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_MAPS_API_KEY"));
}

#[test]
fn serve_exits_on_eof() {
    cli()
        .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
        .arg("serve")
        .write_stdin("{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""result":{}"#));
}

#[test]
fn bad_log_level_is_rejected() {
    cli()
        .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
        .args(["--log-level", "gmaps_lib=loud", "tools"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid log filter"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn call_prints_tool_output() {
    let stub = StubServer::start([(
        "/geocode/json",
        StubResponse::json(json!({
            "status": "OK",
            "results": [{
                "place_id": "P1",
                "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA",
                "geometry": {"location": {"lat": 37.4, "lng": -122.1}}
            }]
        })),
    )])
    .await;
    let geocode_url = format!("{}/geocode/json", stub.base_url());

    let output = tokio::task::spawn_blocking(move || {
        cli()
            .env("GOOGLE_MAPS_API_KEY", "cli-test-key")
            .env("GOOGLE_MAPS_GEOCODE_URL", geocode_url)
            .args([
                "call",
                "maps_geocode",
                "--args",
                r#"{"address": "1600 Amphitheatre Parkway"}"#,
            ])
            .output()
            .expect("run gmaps-cli call")
    })
    .await
    .expect("client thread");

    assert!(output.status.success());
    let printed: Value = serde_json::from_slice(&output.stdout).expect("output is JSON");
    assert_eq!(printed["place_id"], "P1");
    assert_eq!(
        printed["formatted_address"],
        "1600 Amphitheatre Pkwy, Mountain View, CA"
    );
    assert_eq!(stub.single_request().query_param("key"), Some("cli-test-key"));
}
