//! Binary smoke tests for the one-shot commands
//!
//! The binary runs in a blocking task while the `wiremock` server keeps
//! serving on the multi-threaded runtime.

mod common;

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use predicates::prelude::*;
use wiremock::MockServer;

fn iterview(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("iterview").expect("binary should build");
    cmd.env_remove("ITERVIEW_API_BASE")
        .env("RUST_LOG", "off")
        .args(["--config", "/nonexistent/iterview.yaml", "--no-color"])
        .args(args);
    cmd
}

async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .expect("command task should not panic")
        .expect("command should run");
    output.assert()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_meta_prints_total() {
    let server = MockServer::start().await;
    common::mount_collection(&server, 4).await;

    run(iterview(&["meta", "--api-base", &server.uri()]))
        .await
        .success()
        .stdout(predicate::str::contains("Total iterations: 4"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_show_json_prints_record() {
    let server = MockServer::start().await;
    common::mount_collection(&server, 2).await;

    let assert = run(iterview(&["show", "2", "--json", "--api-base", &server.uri()]))
        .await
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be JSON");
    assert_eq!(value["id"], 2);
    assert_eq!(value["tokens"]["in"], 1002);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_show_text_output() {
    let server = MockServer::start().await;
    common::mount_collection(&server, 1).await;

    run(iterview(&["show", "1", "--api-base", &server.uri()]))
        .await
        .success()
        .stdout(predicate::str::contains("Output of iteration 1"))
        .stdout(predicate::str::contains("Cost: $0.0125  Runtime: 4.00s"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_show_missing_record_fails() {
    let server = MockServer::start().await;
    common::mount_collection(&server, 1).await;

    run(iterview(&["show", "5", "--api-base", &server.uri()]))
        .await
        .failure()
        .stderr(predicate::str::contains("Failed to fetch iteration 5"));
}

#[test]
fn test_invalid_api_base_is_rejected() {
    iterview(&["meta", "--api-base", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}
