//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a prr command with a fixed actor
pub fn prr() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("prr"));
    cmd.env("PRR_ACTOR", "test.clerk")
        .env_remove("PRR_ENVIRONMENT")
        .env_remove("PRR_MODULE")
        .env_remove("PRR_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    prr().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to log a request received on 2026-02-02, returning its case ID
pub fn create_test_case(tmp: &TempDir, name: &str, text: &str) -> String {
    create_test_case_at(tmp, name, text, "2026-02-02")
}

/// Helper to log a request received at `received_at`, returning its case ID
pub fn create_test_case_at(tmp: &TempDir, name: &str, text: &str, received_at: &str) -> String {
    let output = prr()
        .current_dir(tmp.path())
        .args([
            "-o",
            "id",
            "new",
            "--name",
            name,
            "--text",
            text,
            "--received-at",
            received_at,
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "prr new failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to record an action that moves a case to `status`
pub fn move_case(tmp: &TempDir, id: &str, action: &str, status: &str) {
    prr()
        .current_dir(tmp.path())
        .args(["act", id, "--action", action, "--status", status])
        .assert()
        .success();
}

/// Path of a case file within the test project
pub fn case_path(tmp: &TempDir, id: &str) -> std::path::PathBuf {
    tmp.path().join("cases").join(format!("{}.prr.yaml", id))
}
