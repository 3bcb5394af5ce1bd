//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway HOME and verify outputs.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_actearly"))
        .args(args)
        .env("HOME", home)
        .env_remove("ACTEARLY_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Parse every JSON document printed on stdout.
fn documents(stdout: &str) -> Vec<Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<Value>()
        .map_while(Result::ok)
        .collect()
}

fn has_event(docs: &[Value], kind: &str) -> bool {
    docs.iter().any(|d| d["type"] == kind)
}

/// Test: timer status prints an idle snapshot on a fresh install.
#[test]
fn test_timer_status() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(code, 0);

    let docs = documents(&stdout);
    let status = docs.last().unwrap();
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["state"], "IDLE");
    assert_eq!(status["is_paused"], false);
}

/// Test: pause and resume persist between invocations.
#[test]
fn test_timer_pause_resume() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "pause"]);
    assert_eq!(code, 0);
    assert!(has_event(&documents(&stdout), "TimerPaused"));

    let (code, _, stderr) = run_cli(home.path(), &["timer", "pause"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("already paused"));

    let (_, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(documents(&stdout).last().unwrap()["is_paused"], true);

    let (code, stdout, _) = run_cli(home.path(), &["timer", "resume"]);
    assert_eq!(code, 0);
    assert!(has_event(&documents(&stdout), "TimerResumed"));
}

/// Test: snoozing without a due break is rejected.
#[test]
fn test_snooze_requires_due_break() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["timer", "snooze"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("idle"));
}

/// Test: config set, get and list round-trip through the database.
#[test]
fn test_config_commands() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "set", "interval_seconds", "600"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "interval_seconds"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "600");

    let (_, stdout, _) = run_cli(home.path(), &["config", "list"]);
    let settings: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(settings["interval_seconds"], 600);

    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "no_such_key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));

    let (code, _, _) = run_cli(home.path(), &["config", "set", "interval_seconds", "0"]);
    assert_eq!(code, 1);

    let (code, _, _) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "interval_seconds"]);
    assert_eq!(stdout.trim(), "1500");
}

/// Test: a full-body session played to the end updates stats and body report.
#[test]
fn test_full_body_session_lifecycle() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["session", "full-body"]);
    assert_eq!(code, 0);
    let docs = documents(&stdout);
    let started = docs
        .iter()
        .find(|d| d["type"] == "SessionStarted")
        .expect("session started");
    let count = started["exercise_count"].as_u64().unwrap();
    assert!(count > 0);

    let (_, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(documents(&stdout).last().unwrap()["state"], "ACTIVE");

    let mut completed = false;
    for _ in 0..count {
        let (code, stdout, _) = run_cli(home.path(), &["session", "next"]);
        assert_eq!(code, 0);
        completed |= has_event(&documents(&stdout), "SessionCompleted");
    }
    assert!(completed);

    let (_, stdout, _) = run_cli(home.path(), &["session", "show"]);
    assert!(stdout.contains("no active session"));

    let (_, stdout, _) = run_cli(home.path(), &["stats"]);
    let stats: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["daily_reps"].as_u64().unwrap(), count);
    assert_eq!(stats["streak_days"], 1);

    let (_, stdout, _) = run_cli(home.path(), &["body"]);
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["ergo_score"], 100);
}

/// Test: advancing without a session fails cleanly.
#[test]
fn test_session_next_without_session() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["session", "next"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

/// Test: hydration log increments today's count.
#[test]
fn test_hydration() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["hydration", "log"]);
    let (code, stdout, _) = run_cli(home.path(), &["hydration", "log"]);
    assert_eq!(code, 0);
    let event: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(event["count_today"], 2);

    let (_, stdout, _) = run_cli(home.path(), &["hydration", "today"]);
    let today: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(today["count"], 2);
}

/// Test: tips fall back to the built-in deck without a backend.
#[test]
fn test_tips_offline() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["tips"]);
    assert_eq!(code, 0);
    let deck: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(deck["ai_available"], false);
    assert!(!deck["tips"].as_array().unwrap().is_empty());
}

/// Test: watch stops after the requested number of ticks.
#[test]
fn test_watch_bounded() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["watch", "--ticks", "1"]);
    assert_eq!(code, 0);
    assert!(has_event(&documents(&stdout), "StateSnapshot"));
}
