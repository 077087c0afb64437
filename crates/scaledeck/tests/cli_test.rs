//! Integration tests for the `scaledeck` CLI binary.
//!
//! Parsing, help and error paths run without a server; the rest drive the
//! binary against a wiremock Headscale.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `scaledeck` binary with env isolation.
///
/// Clears all `SCALEDECK_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn scaledeck_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("scaledeck");
    cmd.env("HOME", "/tmp/scaledeck-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/scaledeck-cli-test-nonexistent")
        .env(
            "SCALEDECK_CONFIG",
            "/tmp/scaledeck-cli-test-nonexistent/config.toml",
        )
        .env("NO_COLOR", "1")
        .env_remove("SCALEDECK_PROFILE")
        .env_remove("SCALEDECK_SERVER")
        .env_remove("SCALEDECK_API_KEY")
        .env_remove("SCALEDECK_OUTPUT")
        .env_remove("SCALEDECK_INSECURE")
        .env_remove("SCALEDECK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// A command already pointed at `server` with a key.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = scaledeck_cmd();
    cmd.args(["--server", &server.uri(), "--api-key", "hskey-api-test-secret"]);
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_users(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": "1", "name": "alice", "email": "alice@example.com" },
                { "ID": "2", "Name": "bob" },
                { "name": "no-id" }
            ]
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = scaledeck_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    scaledeck_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Headscale")
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("nodes"))
            .and(predicate::str::contains("export")),
    );
}

#[test]
fn test_version_flag() {
    scaledeck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scaledeck"));
}

#[test]
fn test_completions() {
    for shell in ["bash", "zsh", "fish"] {
        scaledeck_cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn test_invalid_subcommand() {
    scaledeck_cmd()
        .arg("routers")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_user_filters_are_exclusive() {
    scaledeck_cmd()
        .args(["users", "list", "--id", "1", "--name", "alice"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_output_format() {
    scaledeck_cmd()
        .args(["--output", "xml", "health"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_no_server_configured() {
    scaledeck_cmd()
        .args(["users", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_server_without_key_is_auth_error() {
    scaledeck_cmd()
        .args(["--server", "https://hs.example.com", "nodes", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_unknown_profile() {
    scaledeck_cmd()
        .args(["--profile", "work", "health"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Profile 'work' not found"));
}

#[test]
fn test_config_show_without_file() {
    scaledeck_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_writes_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    scaledeck_cmd()
        .env("SCALEDECK_CONFIG", &config_path)
        .args(["config", "set", "server", "https://hs.example.com"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("[profiles.default]"), "{written}");
    assert!(written.contains("server = \"https://hs.example.com\""), "{written}");
}

// ── Against a server ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_users_list_json_skips_bad_records() {
    let server = MockServer::start().await;
    mount_users(&server).await;

    let mut cmd = against(&server);
    cmd.args(["-o", "json", "users", "list"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let users: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["alice", "bob"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_users_list_by_email_sends_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .and(query_param("email", "alice@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": "1", "name": "alice" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "plain", "users", "list", "--email", "alice@example.com"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_prints_session_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.arg("health");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("session expired"), "{stderr}");
    assert!(stderr.contains("Authentication failed"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_apikeys_delete_by_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/apikey/AbCdEf012345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-y", "apikeys", "delete", "hskey-api-AbCdEf012345-***"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_delete_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/node/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "node": { "id": "5", "name": "laptop", "user": { "id": "1", "name": "alice" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/node/5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-y", "nodes", "delete", "5"]);
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("database is locked"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_users_csv_to_directory() {
    let server = MockServer::start().await;
    mount_users(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = against(&server);
    cmd.args(["export", "--format", "csv", "--resource", "users", "--dir"])
        .arg(dir.path());
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("scaledeck-export-"), "{name}");
    assert!(name.ends_with("-users.csv"), "{name}");

    let csv = std::fs::read_to_string(&files[0]).unwrap();
    assert!(csv.contains("alice@example.com"), "{csv}");
    assert_eq!(csv.lines().count(), 3, "{csv}");
}
