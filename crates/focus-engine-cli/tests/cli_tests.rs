//! Integration tests for the `focus-engine` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise every subcommand
//! through the actual binary, including stdin/stdout piping, file I/O, config
//! layering, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const NOW: &str = "2026-03-16T06:00:00Z";

/// Path to a file under `tests/fixtures/`.
macro_rules! fixture {
    ($name:literal) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/", $name)
    };
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("focus-engine").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout must be valid JSON")
}

fn placements(result: &Value) -> Vec<(String, String)> {
    result["scheduled_tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["task"]["id"].as_str().unwrap().to_string(),
                s["scheduled_start"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// schedule
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn schedule_fixture_in_priority_order() {
    let result = stdout_json(bin().args(["schedule", "-i", fixture!("schedule.json"), "--now", NOW]));

    assert_eq!(
        placements(&result),
        vec![
            ("deck".to_string(), "2026-03-16T10:10:00Z".to_string()),
            ("roadmap".to_string(), "2026-03-16T12:10:00Z".to_string()),
            ("newsletter".to_string(), "2026-03-16T13:10:00Z".to_string()),
        ]
    );
    assert_eq!(result["summary"]["total_scheduled"], 3);
    assert_eq!(result["summary"]["total_minutes_scheduled"], 210);
    assert_eq!(result["created_blocks"][0]["id"], "auto-deck");
    assert_eq!(result["created_blocks"][0]["context"], "fundraising");
    assert_eq!(result["created_blocks"][0]["metadata"]["source"], "auto-scheduler");
}

#[test]
fn schedule_reads_stdin() {
    let input = r#"{"target_date":"2026-03-16","tasks":[{"id":"t","name":"Tidy"}]}"#;

    let result = stdout_json(bin().args(["schedule", "--now", NOW]).write_stdin(input));

    assert_eq!(
        placements(&result),
        vec![("t".to_string(), "2026-03-16T09:00:00Z".to_string())]
    );
}

#[test]
fn schedule_with_config_file() {
    let result = stdout_json(bin().args([
        "schedule",
        "-i",
        fixture!("schedule.json"),
        "--now",
        NOW,
        "--config",
        fixture!("focus.toml"),
    ]));

    // 08:00-12:00, no buffer: free 08:00-09:00 and 10:00-12:00 on Monday.
    assert_eq!(
        placements(&result),
        vec![
            ("deck".to_string(), "2026-03-16T10:00:00Z".to_string()),
            ("roadmap".to_string(), "2026-03-16T08:00:00Z".to_string()),
            ("newsletter".to_string(), "2026-03-17T08:00:00Z".to_string()),
        ]
    );
    assert_eq!(result["summary"]["focus_time_goal_minutes"], 120);
    assert_eq!(result["summary"]["focus_goal_met"], true);
}

#[test]
fn schedule_writes_output_file() {
    let output_path = "/tmp/focus-engine-test-schedule-output.json";
    let _ = std::fs::remove_file(output_path);

    bin()
        .args(["schedule", "-i", fixture!("schedule.json"), "--now", NOW, "-o", output_path])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    let result: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(result["summary"]["total_scheduled"], 3);

    let _ = std::fs::remove_file(output_path);
}

#[test]
fn schedule_rejects_malformed_json() {
    bin()
        .args(["schedule", "--now", NOW])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schedule input JSON"));
}

#[test]
fn schedule_rejects_bad_now() {
    bin()
        .args(["schedule", "-i", fixture!("schedule.json"), "--now", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid RFC 3339 timestamp"));
}

#[test]
fn verbose_logs_go_to_stderr_only() {
    let assert = bin()
        .args(["schedule", "-i", fixture!("schedule.json"), "--now", NOW, "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("auto-schedule complete"));

    let stdout = assert.get_output().stdout.clone();
    assert!(serde_json::from_slice::<Value>(&stdout).is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// config layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_working_hours_fail_fast() {
    bin()
        .args(["schedule", "-i", fixture!("schedule.json"), "--config", fixture!("bad_hours.toml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid working hours"));
}

#[test]
fn missing_config_file_fails() {
    bin()
        .args(["slots", "--date", "2026-03-16", "-i", fixture!("blocks.json"), "--config", "/nonexistent/focus.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn env_vars_override_defaults() {
    let slots = stdout_json(
        bin()
            .args(["slots", "--date", "2026-03-16", "-i", fixture!("blocks.json")])
            .env("FOCUS_ENGINE_BUFFER_MINUTES", "0")
            .env("FOCUS_ENGINE_WORKING_HOURS_START", "08:00"),
    );

    let starts: Vec<&str> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["start"].as_str().unwrap())
        .collect();
    assert_eq!(
        starts,
        vec!["2026-03-16T08:00:00Z", "2026-03-16T10:00:00Z", "2026-03-16T13:00:00Z"]
    );
}

#[test]
fn env_vars_with_double_underscore_nesting() {
    let slots = stdout_json(
        bin()
            .args(["slots", "--date", "2026-03-16", "-i", fixture!("blocks.json")])
            .env("FOCUS_ENGINE_BUFFER_MINUTES", "0")
            .env("FOCUS_ENGINE_WORKING_HOURS__START", "08:00")
            .env("FOCUS_ENGINE_WORKING_HOURS__END", "16:00"),
    );

    let spans: Vec<(&str, &str)> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s["start"].as_str().unwrap(), s["end"].as_str().unwrap()))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("2026-03-16T08:00:00Z", "2026-03-16T09:00:00Z"),
            ("2026-03-16T10:00:00Z", "2026-03-16T12:00:00Z"),
            ("2026-03-16T13:00:00Z", "2026-03-16T16:00:00Z"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// slots / conflicts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_for_day_with_buffer() {
    let slots = stdout_json(bin().args(["slots", "--date", "2026-03-16", "-i", fixture!("blocks.json")]));

    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], "2026-03-16T10:10:00Z");
    assert_eq!(slots[0]["duration_minutes"], 100);
    assert_eq!(slots[1]["start"], "2026-03-16T13:10:00Z");
    assert_eq!(slots[1]["duration_minutes"], 230);
}

#[test]
fn slots_rejects_bad_date() {
    bin()
        .args(["slots", "--date", "16/03/2026", "-i", fixture!("blocks.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn conflicts_reports_overlapping_blocks() {
    let report = stdout_json(bin().args([
        "conflicts",
        "--start",
        "2026-03-16T11:30:00Z",
        "--end",
        "2026-03-16T12:30:00Z",
        "-i",
        fixture!("blocks.json"),
    ]));

    assert_eq!(report["has_conflict"], true);
    assert_eq!(report["conflicting_blocks"][0]["id"], "lunch");
    assert_eq!(report["total_overlap_minutes"], 30);
}

#[test]
fn conflicts_adjacent_span_is_clear() {
    let report = stdout_json(bin().args([
        "conflicts",
        "--start",
        "2026-03-16T10:00:00Z",
        "--end",
        "2026-03-16T12:00:00Z",
        "-i",
        fixture!("blocks.json"),
    ]));

    assert_eq!(report["has_conflict"], false);
}

#[test]
fn conflicts_rejects_inverted_span() {
    bin()
        .args([
            "conflicts",
            "--start",
            "2026-03-16T12:00:00Z",
            "--end",
            "2026-03-16T11:00:00Z",
            "-i",
            fixture!("blocks.json"),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--end must be after --start"));
}

// ─────────────────────────────────────────────────────────────────────────────
// reschedule / triage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reschedule_moves_only_tasks_on_removed_blocks() {
    let result = stdout_json(bin().args([
        "reschedule",
        "--removed",
        "auto-deck",
        "-i",
        fixture!("reschedule.json"),
        "--now",
        NOW,
    ]));

    // 09:00-09:50 is too short; next free time is after the board call + buffer.
    assert_eq!(
        placements(&result),
        vec![("deck".to_string(), "2026-03-16T11:40:00Z".to_string())]
    );
    assert_eq!(result["summary"]["total_unscheduled"], 0);
}

#[test]
fn triage_infers_all_fields() {
    let triage = stdout_json(bin().args([
        "triage",
        "--name",
        "Investor update email",
        "--due",
        "2026-03-20",
        "--today",
        "2026-03-16",
    ]));

    assert_eq!(triage["duration_minutes"], 15);
    assert_eq!(triage["priority_level"], "p1");
    assert_eq!(triage["context"], "fundraising");
    assert_eq!(triage["do_date"], "2026-03-19");
}

#[test]
fn triage_without_due_date_omits_do_date() {
    let triage = stdout_json(bin().args(["triage", "--name", "Water plants", "--context", "house"]));

    assert_eq!(triage["duration_minutes"], 30);
    assert_eq!(triage["priority_level"], "p4");
    assert_eq!(triage["context"], "house");
    assert!(triage.get("do_date").is_none());
}

#[test]
fn no_subcommand_shows_usage() {
    bin()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
