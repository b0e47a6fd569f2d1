use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

fn write_store(dir: &TempDir, tasks: serde_json::Value) -> PathBuf {
    let path = dir.path().join("schedule.json");
    let content = serde_json::json!({ "tasks": tasks });
    std::fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
    path
}

fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn run(store: &Path, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    Command::new(exe)
        .args(args)
        .env("TASKBOT_STORE_PATH", store)
        .env("TASKBOT_CONFIG_PATH", store.with_file_name("config.json"))
        .output()
        .expect("failed to run taskbot")
}

fn local_today() -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap()
}

#[test]
fn mark_then_complete_records_today() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        &dir,
        serde_json::json!([
            { "name": "Write report", "category": "work", "status": "pending", "history": [] }
        ]),
    );

    let marked = run(&store, &["mark_in_progress", "Write", "report"]);
    assert!(marked.status.success());
    assert!(String::from_utf8_lossy(&marked.stdout).contains("is now in progress"));
    assert_eq!(read_store(&store)["tasks"][0]["status"], "in progress");

    let completed = run(&store, &["Write", "report"]);
    assert!(completed.status.success());
    assert!(String::from_utf8_lossy(&completed.stdout).contains("marked as completed on"));

    let stored = read_store(&store);
    assert_eq!(stored["tasks"][0]["status"], "completed");
    assert_eq!(
        stored["tasks"][0]["history"],
        serde_json::json!([local_today()])
    );
}

#[test]
fn complete_pending_task_is_refused_without_change() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        &dir,
        serde_json::json!([
            { "name": "Gym", "category": "health", "status": "pending", "history": [] }
        ]),
    );
    let before = read_store(&store);

    let output = run(&store, &["gym"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Task 'Gym' is not in progress yet."
    );
    assert_eq!(read_store(&store), before);
}

#[test]
fn complete_unknown_task_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(&dir, serde_json::json!([]));

    let output = run(&store, &["Walk", "the", "dog"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Task 'Walk the dog' not found."
    );
}

#[test]
fn mark_in_progress_requires_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(&dir, serde_json::json!([]));

    let output = run(&store, &["mark_in_progress"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn complete_json_includes_task_and_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_store(
        &dir,
        serde_json::json!([
            { "name": "Gym", "category": "health", "status": "in progress", "history": ["2024-01-01"] }
        ]),
    );

    let output = run(&store, &["--json", "Gym"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["outcome"], "completed");
    assert_eq!(parsed["date"], local_today());
    assert_eq!(parsed["task"]["status"], "completed");
    assert_eq!(
        parsed["task"]["history"],
        serde_json::json!(["2024-01-01", local_today()])
    );
}
