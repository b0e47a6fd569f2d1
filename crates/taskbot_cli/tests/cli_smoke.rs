use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run taskbot --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("get_tasks_by_date"));
    assert!(stdout.contains("mark_in_progress"));
}

#[test]
fn cli_rejects_malformed_override() {
    let exe = env!("CARGO_BIN_EXE_taskbot");
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(exe)
        .args(["--config-override", "no-equals-sign", "get_pending_tasks"])
        .env("TASKBOT_CONFIG_PATH", dir.path().join("config.json"))
        .env("TASKBOT_STORE_PATH", dir.path().join("schedule.json"))
        .output()
        .expect("failed to run taskbot");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}
