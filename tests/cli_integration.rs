//! CLI integration tests for leveler
//!
//! These tests run the binary against task files on disk and verify the
//! printed order, the error diagnostics and the exit status.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tempfile::TempDir;

const DIAMOND: &str = r#"
tasks:
  - name: A
    dependencies: []
  - name: B
    dependencies: [A]
  - name: C
    dependencies: [A]
  - name: D
    dependencies: [B, C]
"#;

/// Empty home shared by every test, so no user config is picked up
fn isolated_home() -> &'static Path {
    static HOME: OnceLock<TempDir> = OnceLock::new();
    HOME.get_or_init(|| TempDir::new().unwrap()).path()
}

/// Get a command instance for the leveler binary
fn leveler_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("leveler"));
    cmd.env_remove("RUST_LOG")
        .env_remove("LEVELER_CONFIG")
        .env("HOME", isolated_home())
        .env("XDG_CONFIG_HOME", isolated_home().join(".config"));
    cmd
}

/// Create a temporary directory with a task file in it
fn setup_tasks(file_name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

// =============================================================================
// Resolve Tests
// =============================================================================

#[test]
fn test_resolve_prints_levels() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("TASK ORDER"))
        .stdout(predicate::str::contains("[A]\n[B, C]\n[D]\n"));
}

#[test]
fn test_resolve_defaults_to_input_yml() {
    let (dir, _path) = setup_tasks("input.yml", DIAMOND);

    leveler_cmd()
        .current_dir(dir.path())
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("[B, C]"));
}

#[test]
fn test_resolve_json() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    let output = leveler_cmd()
        .args(["resolve", "--format", "json"])
        .arg(&path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["levels"], serde_json::json!([["A"], ["B", "C"], ["D"]]));
    assert_eq!(json["passes"], 1);
    assert!(json.get("steps").is_none());
}

#[test]
fn test_resolve_json_with_trace() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    let output = leveler_cmd()
        .args(["resolve", "--trace", "-f", "json"])
        .arg(&path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[3]["name"], "D");
    assert_eq!(steps[3]["level"], 2);
}

#[test]
fn test_resolve_trace_text() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    leveler_cmd()
        .args(["resolve", "--trace"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("B completed in iteration: 1"))
        .stdout(predicate::str::contains("D completed in iteration: 2"));
}

#[test]
fn test_resolve_json_input_file() {
    let (_dir, path) = setup_tasks(
        "tasks.json",
        r#"{"tasks": [{"name": "build"}, {"name": "ship", "dependencies": ["build"]}]}"#,
    );

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[build]\n[ship]\n"));
}

#[test]
fn test_resolve_from_stdin() {
    leveler_cmd()
        .args(["resolve", "-"])
        .write_stdin("tasks:\n  - name: A\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[A]"));
}

#[test]
fn test_resolve_empty_task_list() {
    let (_dir, path) = setup_tasks("tasks.yml", "tasks: []\n");

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks to resolve."));
}

// =============================================================================
// Structural Error Tests
// =============================================================================

#[test]
fn test_cycle_exits_with_structural_status() {
    let (_dir, path) = setup_tasks(
        "tasks.yml",
        "tasks:\n  - name: A\n    dependencies: [B]\n  - name: B\n    dependencies: [A]\n",
    );

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cyclic dependency detected"))
        .stderr(predicate::str::contains("tasks in cycle: A, B"))
        .stderr(predicate::str::contains("WARN").not())
        .stderr(predicate::str::contains("\x1b[").not());
}

#[test]
fn test_cycle_members_listed_without_path_arrows() {
    let (_dir, path) = setup_tasks(
        "tasks.yml",
        "tasks:\n  - name: A\n    dependencies: [B]\n  - name: B\n    dependencies: [C]\n  - name: C\n    dependencies: [A]\n",
    );

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("tasks in cycle: A, B, C"))
        .stderr(predicate::str::contains("<->").not());
}

#[test]
fn test_cycle_json_details() {
    let (_dir, path) = setup_tasks(
        "tasks.yml",
        "tasks:\n  - name: A\n    dependencies: [B]\n  - name: B\n    dependencies: [A]\n",
    );

    let output = leveler_cmd()
        .args(["resolve", "-f", "json"])
        .arg(&path)
        .assert()
        .code(2);

    let stderr = String::from_utf8_lossy(&output.get_output().stderr);
    let line = stderr
        .lines()
        .find(|l| l.starts_with('{'))
        .expect("json error line");
    let json: serde_json::Value = serde_json::from_str(line).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["details"]["kind"], "cyclic_dependency");
    assert_eq!(json["details"]["unresolved"], serde_json::json!(["A", "B"]));
}

#[test]
fn test_unknown_dependency() {
    let (_dir, path) = setup_tasks("tasks.yml", "tasks:\n  - name: A\n    dependencies: [X]\n");

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Task 'A' depends on undeclared task 'X'",
        ));
}

#[test]
fn test_unknown_dependency_lenient_is_a_cycle() {
    let (_dir, path) = setup_tasks("tasks.yml", "tasks:\n  - name: A\n    dependencies: [X]\n");

    leveler_cmd()
        .args(["resolve", "--lenient"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unresolved tasks: A"));
}

#[test]
fn test_max_levels_ceiling() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    leveler_cmd()
        .args(["resolve", "--max-levels", "2"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("level ceiling of 2"));
}

// =============================================================================
// Input and Configuration Errors
// =============================================================================

#[test]
fn test_missing_file_is_general_failure() {
    let dir = TempDir::new().unwrap();

    leveler_cmd()
        .arg("resolve")
        .arg(dir.path().join("missing.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read task file"));
}

#[test]
fn test_malformed_file_is_general_failure() {
    let (_dir, path) = setup_tasks("tasks.yml", "tasks:\n  - dependencies: [A]\n");

    leveler_cmd()
        .arg("resolve")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse task file"));
}

#[test]
fn test_project_config_is_discovered() {
    let (dir, _path) = setup_tasks("pipeline.yml", DIAMOND);
    fs::write(
        dir.path().join("leveler.toml"),
        "input = \"pipeline.yml\"\n\n[resolver]\nmax_levels = 2\n",
    )
    .unwrap();

    let sub_dir = dir.path().join("nested");
    fs::create_dir_all(&sub_dir).unwrap();

    leveler_cmd()
        .current_dir(&sub_dir)
        .arg("resolve")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("level ceiling of 2"));
}

#[test]
fn test_explicit_config_flag() {
    let (dir, _path) = setup_tasks("pipeline.yml", DIAMOND);
    let config = dir.path().join("custom.toml");
    fs::write(&config, "input = \"pipeline.yml\"\n").unwrap();

    leveler_cmd()
        .arg("resolve")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("[D]"));
}

#[test]
fn test_invalid_config_is_general_failure() {
    let (dir, _path) = setup_tasks("input.yml", DIAMOND);
    fs::write(dir.path().join("leveler.toml"), "[resolver]\nmax_levels = 0\n").unwrap();

    leveler_cmd()
        .current_dir(dir.path())
        .arg("resolve")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_levels must be at least 1"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_config_default_format() {
    let (dir, path) = setup_tasks("tasks.yml", DIAMOND);
    let config_home = dir.path().join("config");
    fs::create_dir_all(config_home.join("leveler")).unwrap();
    fs::write(
        config_home.join("leveler").join("config.toml"),
        "default_format = \"json\"\n",
    )
    .unwrap();

    leveler_cmd()
        .env("XDG_CONFIG_HOME", &config_home)
        .arg("resolve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"levels\""))
        .stdout(predicate::str::contains("TASK ORDER").not());
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_valid_file() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    leveler_cmd()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 4 task(s) in 3 level(s)"));
}

#[test]
fn test_check_json() {
    let (_dir, path) = setup_tasks("tasks.yml", DIAMOND);

    let output = leveler_cmd()
        .args(["check", "-f", "json"])
        .arg(&path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["tasks"], 4);
    assert_eq!(json["levels"], 3);
    assert_eq!(json["widest_level"], 2);
}

#[test]
fn test_check_duplicate_names() {
    let (_dir, path) = setup_tasks("tasks.yml", "tasks:\n  - name: A\n  - name: A\n");

    leveler_cmd()
        .arg("check")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Duplicate task name: A"));
}
