//! CLI end-to-end tests
//!
//! Tests for the arrbridge command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::process::Command;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the arrbridge binary
#[allow(deprecated)]
fn arrbridge_cmd() -> Command {
    Command::cargo_bin("arrbridge").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = arrbridge_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = arrbridge_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plex-refresh"))
        .stdout(predicate::str::contains("sonarr-rename"))
        .stdout(predicate::str::contains("bazarr-search"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = arrbridge_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("arrbridge"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("arrbridge.toml");
    fs::write(
        &config_path,
        r#"
[sonarr]
url = "http://localhost:8989/"
api_key = "abc"

[paths]
source_root = "W:\\TV"
target_root = "/tv"
"#,
    )
    .unwrap();

    let mut cmd = arrbridge_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Sonarr: configured"))
        .stdout(predicate::str::contains("Plex: not configured"));
}

#[test]
fn test_cli_validate_rejects_missing_key() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("arrbridge.toml");
    fs::write(&config_path, "[bazarr]\nurl = \"http://localhost:6767\"\n").unwrap();

    let mut cmd = arrbridge_cmd();
    cmd.args(["--config"])
        .arg(&config_path)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_key"));
}

#[test]
fn test_cli_unconfigured_service_fails() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("empty.toml");
    fs::write(&config_path, "").unwrap();

    let mut cmd = arrbridge_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["sonarr-rename", "/tv/Show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sonarr"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_unknown_series_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/series/lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/series"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let mut cmd = arrbridge_cmd();
        cmd.args(["sonarr-rename", "/tv/Missing Show", "--url", &uri, "--api-key", "k"])
            .assert()
            .code(2)
            .stdout(predicate::str::contains("not found"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_plex_section_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/library/sections/3/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let mut cmd = arrbridge_cmd();
        cmd.args(["plex-refresh", "--url", &uri, "--token", "t", "--section", "3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("success"));
    })
    .await
    .unwrap();
}
