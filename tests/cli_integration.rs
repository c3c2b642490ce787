//! Integration tests for the `taskmate` CLI.
//!
//! Each test points `taskmate` at a temp data directory with `-C`, runs it as
//! a subprocess, and checks stdout and the stored files.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `taskmate` binary.
fn taskmate_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("taskmate");
    path
}

fn data_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().join("data")
}

/// Run `taskmate -C <tmp>/data` with the given args from inside `tmp`,
/// returning (stdout, stderr, success).
fn run(tmp: &TempDir, args: &[&str]) -> (String, String, bool) {
    let data = data_dir(tmp);
    let output = Command::new(taskmate_bin())
        .arg("-C")
        .arg(&data)
        .args(args)
        .current_dir(tmp.path())
        .env_remove("TASKMATE_LOG")
        .output()
        .expect("failed to run taskmate");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run expecting success, return stdout.
fn run_ok(tmp: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, success) = run(tmp, args);
    if !success {
        panic!(
            "taskmate {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Add a task and return its id.
fn add(tmp: &TempDir, args: &[&str]) -> String {
    let mut full = vec!["add"];
    full.extend_from_slice(args);
    run_ok(tmp, &full).trim().to_string()
}

fn stored_tasks(tmp: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(data_dir(tmp).join("taskmate_data")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Add / list / show
// ---------------------------------------------------------------------------

#[test]
fn test_empty_list() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(run_ok(&tmp, &["list"]), "No tasks found.\n");
}

#[test]
fn test_add_then_list_newest_first() {
    let tmp = TempDir::new().unwrap();
    let first = add(&tmp, &["Write report", "-p", "high"]);
    let second = add(&tmp, &["Buy milk"]);
    assert_ne!(first, second);

    let out = run_ok(&tmp, &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Buy milk (medium)"));
    assert!(lines[1].contains("Write report (high)"));

    let tasks = stored_tasks(&tmp);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[1]["priority"], "high");
    assert_eq!(tasks[1]["status"], "todo");
}

#[test]
fn test_add_rejects_blank_title() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run(&tmp, &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("title must not be empty"));
    assert!(!data_dir(&tmp).join("taskmate_data").exists());
}

#[test]
fn test_add_with_steps_and_due() {
    let tmp = TempDir::new().unwrap();
    let id = add(
        &tmp,
        &["Write report", "-d", "2030-01-15", "-s", "Outline", "-s", "Draft"],
    );

    let list = run_ok(&tmp, &["list"]);
    assert!(list.contains("0/2 steps"));
    assert!(list.contains("due 2030-01-15"));

    let show = run_ok(&tmp, &["show", &id]);
    assert!(show.contains("due: 2030-01-15"));
    assert!(show.contains("steps: 0/2"));
    assert!(show.contains("  1. [ ] Outline"));
    assert!(show.contains("  2. [ ] Draft"));
}

#[test]
fn test_add_rejects_bad_date() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run(&tmp, &["add", "Write report", "-d", "next week"]);
    assert!(!success);
    assert!(stderr.contains("invalid due date"));
}

#[test]
fn test_search_and_filter() {
    let tmp = TempDir::new().unwrap();
    let report = add(&tmp, &["Write report"]);
    add(&tmp, &["Buy milk"]);
    run_ok(&tmp, &["done", &report]);

    let out = run_ok(&tmp, &["list", "-s", "REPORT"]);
    assert!(out.contains("Write report"));
    assert!(!out.contains("Buy milk"));

    let active = run_ok(&tmp, &["list", "-f", "active"]);
    assert!(active.contains("Buy milk"));
    assert!(!active.contains("Write report"));

    let completed = run_ok(&tmp, &["list", "-f", "completed"]);
    assert!(completed.contains("[x]"));
    assert!(completed.contains("Write report"));
}

#[test]
fn test_list_json() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, &["Write report"]);
    let out = run_ok(&tmp, &["--json", "list"]);
    let view: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(view["filter"], "all");
    assert_eq!(view["total"], 1);
    assert_eq!(view["items"][0]["title"], "Write report");
}

// ---------------------------------------------------------------------------
// Edit / status / steps
// ---------------------------------------------------------------------------

#[test]
fn test_edit_keeps_status() {
    let tmp = TempDir::new().unwrap();
    let id = add(&tmp, &["Write report"]);
    run_ok(&tmp, &["status", &id, "doing"]);
    run_ok(&tmp, &["edit", &id, "--title", "Write final report", "-p", "low"]);

    let tasks = stored_tasks(&tmp);
    assert_eq!(tasks[0]["title"], "Write final report");
    assert_eq!(tasks[0]["priority"], "low");
    assert_eq!(tasks[0]["status"], "doing");
}

#[test]
fn test_status_and_toggle() {
    let tmp = TempDir::new().unwrap();
    let id = add(&tmp, &["Write report"]);

    assert_eq!(run_ok(&tmp, &["status", &id, "doing"]), format!("{} doing\n", id));
    assert_eq!(run_ok(&tmp, &["toggle", &id]), format!("{} done\n", id));
    assert_eq!(run_ok(&tmp, &["toggle", &id]), format!("{} todo\n", id));

    let (_, stderr, success) = run(&tmp, &["status", &id, "blocked"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_steps() {
    let tmp = TempDir::new().unwrap();
    let id = add(&tmp, &["Write report"]);

    assert_eq!(
        run_ok(&tmp, &["step", "add", &id, "Outline"]),
        format!("{} step 1 added\n", id)
    );
    run_ok(&tmp, &["step", "add", &id, "Draft"]);
    assert_eq!(
        run_ok(&tmp, &["step", "toggle", &id, "1"]),
        format!("{} step 1 done\n", id)
    );
    assert!(run_ok(&tmp, &["list"]).contains("1/2 steps"));

    assert_eq!(
        run_ok(&tmp, &["step", "rm", &id, "2"]),
        format!("{} removed step: Draft\n", id)
    );
    let (_, stderr, success) = run(&tmp, &["step", "toggle", &id, "5"]);
    assert!(!success);
    assert!(stderr.contains("has no step 5"));
}

// ---------------------------------------------------------------------------
// Delete / errors
// ---------------------------------------------------------------------------

#[test]
fn test_delete_with_yes() {
    let tmp = TempDir::new().unwrap();
    let keep = add(&tmp, &["Buy milk"]);
    let gone = add(&tmp, &["Write report"]);

    assert_eq!(run_ok(&tmp, &["delete", &gone, "--yes"]), format!("deleted {}\n", gone));
    let tasks = stored_tasks(&tmp);
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["id"], keep.as_str());
}

#[test]
fn test_delete_unknown_id_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let id = add(&tmp, &["Write report"]);
    let (_, stderr, success) = run(&tmp, &["delete", &id, "missing", "--yes"]);
    assert!(!success);
    assert!(stderr.contains("task not found: missing"));
    assert_eq!(stored_tasks(&tmp).as_array().unwrap().len(), 1);
}

#[test]
fn test_show_not_found() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run(&tmp, &["show", "nope"]);
    assert!(!success);
    assert!(stderr.contains("error: task not found: nope"));
}

#[test]
fn test_corrupt_data_is_reported_and_kept() {
    let tmp = TempDir::new().unwrap();
    let data = data_dir(&tmp);
    fs::create_dir_all(&data).unwrap();
    let path = data.join("taskmate_data");
    fs::write(&path, "{not json").unwrap();

    let (_, stderr, success) = run(&tmp, &["list"]);
    assert!(!success);
    assert!(stderr.contains("not a valid task list"));

    let (_, _, success) = run(&tmp, &["add", "Write report"]);
    assert!(!success);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
}

// ---------------------------------------------------------------------------
// Board / stats / export / theme
// ---------------------------------------------------------------------------

#[test]
fn test_board_columns() {
    let tmp = TempDir::new().unwrap();
    let doing = add(&tmp, &["Write report"]);
    add(&tmp, &["Buy milk"]);
    run_ok(&tmp, &["status", &doing, "doing"]);

    let out = run_ok(&tmp, &["board"]);
    let header = out.lines().next().unwrap();
    assert!(header.contains("To Do (1)"));
    assert!(header.contains("In Progress (1)"));
    assert!(header.contains("Done (0)"));
}

#[test]
fn test_stats() {
    let tmp = TempDir::new().unwrap();
    let done = add(&tmp, &["Write report"]);
    add(&tmp, &["Buy milk"]);
    run_ok(&tmp, &["done", &done]);

    let out = run_ok(&tmp, &["stats"]);
    assert!(out.lines().last().unwrap().contains("(50% done)"));

    let json: serde_json::Value = serde_json::from_str(&run_ok(&tmp, &["--json", "stats"])).unwrap();
    assert_eq!(json, serde_json::json!({ "todo": 1, "doing": 0, "done": 1 }));
}

#[test]
fn test_export_default_file() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, &["Write report"]);
    assert_eq!(
        run_ok(&tmp, &["export"]),
        "exported 1 tasks to mytasks.json\n"
    );

    let raw = fs::read_to_string(tmp.path().join("mytasks.json")).unwrap();
    let exported: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(exported, stored_tasks(&tmp));
}

#[test]
fn test_theme() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(run_ok(&tmp, &["theme"]), "dark\n");
    assert_eq!(run_ok(&tmp, &["theme", "light"]), "light\n");
    assert_eq!(run_ok(&tmp, &["theme"]), "light\n");
    assert_eq!(
        fs::read_to_string(data_dir(&tmp).join("taskmate_theme")).unwrap(),
        "light"
    );

    let (_, _, success) = run(&tmp, &["theme", "neon"]);
    assert!(!success);
}

// ---------------------------------------------------------------------------
// Init / focus
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config_once() {
    let tmp = TempDir::new().unwrap();
    let out = run_ok(&tmp, &["init"]);
    assert!(out.starts_with("Initialized taskmate in"));
    let config = fs::read_to_string(data_dir(&tmp).join("taskmate.toml")).unwrap();
    assert!(config.contains("[timer]"));

    let (_, stderr, success) = run(&tmp, &["init"]);
    assert!(!success);
    assert!(stderr.contains("use --force"));
    run_ok(&tmp, &["init", "--force"]);
}

#[test]
fn test_focus_session_marks_task_done() {
    let tmp = TempDir::new().unwrap();
    let id = add(&tmp, &["Write report"]);

    let out = run_ok(&tmp, &["focus", &id, "--seconds", "1", "--yes"]);
    assert!(out.contains("Focus Session Complete! Take a break."));
    assert!(out.contains(&format!("{} done", id)));
    assert_eq!(stored_tasks(&tmp)[0]["status"], "done");
}

#[test]
fn test_focus_unknown_task() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run(&tmp, &["focus", "nope", "--seconds", "1"]);
    assert!(!success);
    assert!(stderr.contains("task not found: nope"));
}

#[test]
fn test_config_controls_focus_default() {
    let tmp = TempDir::new().unwrap();
    let data = data_dir(&tmp);
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("taskmate.toml"), "[timer]\nminutes = 'soon'\n").unwrap();

    let (_, stderr, success) = run(&tmp, &["focus", "--seconds", "1"]);
    assert!(!success);
    assert!(stderr.contains("taskmate.toml"));
}
