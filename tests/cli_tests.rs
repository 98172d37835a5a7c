//! CLI and basic command tests

mod common;

use common::{case_path, create_test_case, create_test_case_at, move_case, prr, setup_test_project};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    prr()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("records request"));
}

#[test]
fn test_version_displays() {
    prr()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prr"));
}

#[test]
fn test_unknown_command_fails() {
    prr()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();
    prr()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not inside a PRR project"));
}

#[test]
fn test_completions_generate() {
    prr()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prr"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    prr()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".prr").is_dir());
    assert!(tmp.path().join(".prr/config.yaml").is_file());
    assert!(tmp.path().join("cases").is_dir());
}

#[test]
fn test_init_twice_requires_force() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    prr()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_init_records_environment_tags() {
    let tmp = TempDir::new().unwrap();
    prr()
        .current_dir(tmp.path())
        .args(["init", "--environment", "staging", "--module", "records-desk"])
        .assert()
        .success();

    let id = create_test_case(&tmp, "Ada Park", "Council minutes, January");
    let content = fs::read_to_string(case_path(&tmp, &id)).unwrap();
    assert!(content.contains("environment: staging"));
    assert!(content.contains("module: records-desk"));
}

// ============================================================================
// New Command Tests
// ============================================================================

#[test]
fn test_new_creates_case_with_t10() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .args([
            "new",
            "--name",
            "Maria Ortiz",
            "--email",
            "maria@example.org",
            "--text",
            "All emails between the mayor and the parks department, 2025",
            "--received-at",
            "2026-02-02",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created case PRR-2026-"))
        .stdout(predicate::str::contains("2026-02-16"));
}

#[test]
fn test_new_writes_case_file() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    assert!(id.starts_with("PRR-2026-"), "unexpected id {id}");
    let content = fs::read_to_string(case_path(&tmp, &id)).unwrap();
    assert!(content.contains("status: INTAKE"));
    assert!(content.contains("action: intake_created"));
    assert!(content.contains("actor: test.clerk"));
    assert!(content.contains("version: 1"));
}

#[test]
fn test_new_json_output() {
    let tmp = setup_test_project();

    let output = prr()
        .current_dir(tmp.path())
        .args([
            "-o",
            "json",
            "new",
            "--name",
            "Lee Chen",
            "--text",
            "Police incident report 2026-0042",
            "--channel",
            "resident-form",
            "--accept-notice",
            "--received-at",
            "2026-02-02",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let case: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(case["status"], "INTAKE");
    assert_eq!(case["intake"]["channel"], "RESIDENT_FORM");
    assert_eq!(case["intake"]["legal_notice_accepted"], true);
    assert_eq!(case["deadlines"]["t10"], "2026-02-16T12:00:00Z");
    assert_eq!(case["audit_log"][0]["action"], "submitted");
}

#[test]
fn test_new_requires_name_and_text() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .args(["new", "--text", "Budget documents"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--name is required"));

    prr()
        .current_dir(tmp.path())
        .args(["new", "--name", "Ada Park"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--text is required"));
}

#[test]
fn test_new_rejects_blank_name() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .args(["new", "--name", "   ", "--text", "Budget documents"])
        .assert()
        .failure();

    assert_eq!(fs::read_dir(tmp.path().join("cases")).unwrap().count(), 0);
}

#[test]
fn test_new_rejects_bad_date() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .args([
            "new",
            "--name",
            "Ada Park",
            "--text",
            "Budget documents",
            "--received-at",
            "02/02/2026",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ============================================================================
// List / Show Command Tests
// ============================================================================

#[test]
fn test_list_shows_cases() {
    let tmp = setup_test_project();
    create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    create_test_case(&tmp, "Tom Reyes", "Planning commission recordings");

    prr()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Ortiz"))
        .stdout(predicate::str::contains("Tom Reyes"))
        .stdout(predicate::str::contains("2 case(s)"));
}

#[test]
fn test_list_empty_project() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases found."));
}

#[test]
fn test_list_count_and_filters() {
    let tmp = setup_test_project();
    create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    create_test_case(&tmp, "Tom Reyes", "Planning commission recordings");

    prr()
        .current_dir(tmp.path())
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("2\n");

    prr()
        .current_dir(tmp.path())
        .args(["list", "--requester", "ortiz", "--count"])
        .assert()
        .success()
        .stdout("1\n");

    prr()
        .current_dir(tmp.path())
        .args(["list", "--search", "RECORDINGS", "--count"])
        .assert()
        .success()
        .stdout("1\n");

    prr()
        .current_dir(tmp.path())
        .args(["list", "--channel", "email", "--count"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_list_ids_in_receipt_order() {
    let tmp = setup_test_project();
    let later = create_test_case_at(&tmp, "Later", "Second request", "2026-03-02");
    let earlier = create_test_case_at(&tmp, "Earlier", "First request", "2026-02-02");

    prr()
        .current_dir(tmp.path())
        .args(["-o", "id", "list"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", earlier, later));
}

#[test]
fn test_list_overdue_flags_old_cases() {
    let tmp = setup_test_project();
    create_test_case_at(&tmp, "Old Request", "Archived ordinances", "2025-01-06");

    prr()
        .current_dir(tmp.path())
        .args(["list", "--overdue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old Request"))
        .stdout(predicate::str::contains("OVERDUE"));
}

#[test]
fn test_short_ids_after_list() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr().current_dir(tmp.path()).arg("list").assert().success();

    prr()
        .current_dir(tmp.path())
        .args(["-o", "id", "show", "@1"])
        .assert()
        .success()
        .stdout(format!("{}\n", id));

    prr()
        .current_dir(tmp.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{} (@1)", id)));
}

#[test]
fn test_show_displays_audit_log() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maria Ortiz"))
        .stdout(predicate::str::contains("Audit log"))
        .stdout(predicate::str::contains("intake_created"))
        .stdout(predicate::str::contains("2026-02-16"));
}

#[test]
fn test_show_accepts_lowercase_id() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args(["-o", "id", "show", &id.to_lowercase()])
        .assert()
        .success()
        .stdout(format!("{}\n", id));
}

#[test]
fn test_show_missing_case_fails() {
    let tmp = setup_test_project();

    prr()
        .current_dir(tmp.path())
        .args(["show", "PRR-2026-ZZZZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Case not found"));
}

// ============================================================================
// Act Command Tests
// ============================================================================

#[test]
fn test_act_walks_full_lifecycle() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "timer_started", "--status", "timer_compute"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INTAKE → TIMER_COMPUTE"));

    move_case(&tmp, &id, "assessed", "ASSESSMENT");
    move_case(&tmp, &id, "gathering", "gather");
    move_case(&tmp, &id, "packaged", "package");
    move_case(&tmp, &id, "delivering", "delivery");
    move_case(&tmp, &id, "delivered", "closed");

    let content = fs::read_to_string(case_path(&tmp, &id)).unwrap();
    assert!(content.contains("status: CLOSED"));
    assert!(content.contains("version: 7"));

    // Closed cases drop out of the default listing
    prr()
        .current_dir(tmp.path())
        .args(["list", "--count"])
        .assert()
        .success()
        .stdout("0\n");
    prr()
        .current_dir(tmp.path())
        .args(["list", "--status", "all", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn test_act_without_status_appends_entry() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args([
            "act",
            &id,
            "--action",
            "called_requester",
            "--detail",
            "Clarified date range",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 'called_requester'"));

    let content = fs::read_to_string(case_path(&tmp, &id)).unwrap();
    assert!(content.contains("status: INTAKE"));
    assert!(content.contains("Clarified date range"));
}

#[test]
fn test_act_rejects_illegal_transition() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    let before = fs::read_to_string(case_path(&tmp, &id)).unwrap();

    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "close", "--status", "closed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Illegal status transition"));

    assert_eq!(fs::read_to_string(case_path(&tmp, &id)).unwrap(), before);
}

#[test]
fn test_act_on_terminal_case() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    move_case(&tmp, &id, "intake_failed", "error");

    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "retry", "--status", "intake"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("terminal"));

    // Notes are still accepted
    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "note", "--detail", "Duplicate of earlier request"])
        .assert()
        .success();
}

#[test]
fn test_act_rejects_unknown_status() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "x", "--status", "archived"])
        .assert()
        .failure();
}

#[test]
fn test_permissive_transitions_from_config() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".prr/config.yaml"),
        "lifecycle:\n  permissive_transitions: true\n",
    )
    .unwrap();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");

    prr()
        .current_dir(tmp.path())
        .args(["act", &id, "--action", "close", "--status", "closed"])
        .assert()
        .success();
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_passes_on_fresh_cases() {
    let tmp = setup_test_project();
    create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    create_test_case(&tmp, "Tom Reyes", "Planning commission recordings");

    prr()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All files passed validation"));
}

#[test]
fn test_validate_reports_invalid_case() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    let path = case_path(&tmp, &id);
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("status: INTAKE", "status: ARCHIVED")).unwrap();

    prr()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn test_validate_warns_on_misnamed_file() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    let misnamed = tmp.path().join("cases/copy.prr.yaml");
    fs::copy(case_path(&tmp, &id), &misnamed).unwrap();

    prr()
        .current_dir(tmp.path())
        .args(["validate", "cases/copy.prr.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file name should be"));

    prr()
        .current_dir(tmp.path())
        .args(["validate", "--strict", "cases/copy.prr.yaml"])
        .assert()
        .failure();
}

// ============================================================================
// Deadline / Log Command Tests
// ============================================================================

#[test]
fn test_deadline_computes_t10() {
    prr()
        .args(["deadline", "2026-02-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-02-16 Mon"));
}

#[test]
fn test_deadline_skips_weekend() {
    prr()
        .args(["-o", "id", "deadline", "2026-02-06", "--days", "1"])
        .assert()
        .success()
        .stdout("2026-02-09\n");
}

#[test]
fn test_deadline_rejects_negative_days() {
    prr()
        .args(["deadline", "2026-02-02", "--days", "-1"])
        .assert()
        .failure();
}

#[test]
fn test_deadline_uses_project_holidays() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(".prr/config.yaml"),
        "calendar:\n  holidays:\n    - 2026-02-16\n",
    )
    .unwrap();

    prr()
        .current_dir(tmp.path())
        .args(["-o", "id", "deadline", "2026-02-02"])
        .assert()
        .success()
        .stdout("2026-02-17\n");
}

#[test]
fn test_log_lists_activity() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    move_case(&tmp, &id, "timer_started", "timer_compute");

    prr()
        .current_dir(tmp.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("Case Activity Log"))
        .stdout(predicate::str::contains("intake_created"))
        .stdout(predicate::str::contains("timer_started"))
        .stdout(predicate::str::contains("2 audit entries"));

    prr()
        .current_dir(tmp.path())
        .args(["log", "--actor", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries found."));
}

#[test]
fn test_log_json_for_one_case() {
    let tmp = setup_test_project();
    let id = create_test_case(&tmp, "Maria Ortiz", "Parks department budget");
    create_test_case(&tmp, "Tom Reyes", "Planning commission recordings");

    let output = prr()
        .current_dir(tmp.path())
        .args(["-o", "json", "log", "--case", &id])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["case_id"], id.as_str());
    assert_eq!(entries[0]["transition"], "CREATED → INTAKE");
}
