//! Tests for the `staffopt init` command

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn staffopt(args: &[&str], file: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_staffopt"))
        .args(args)
        .arg(file)
        .output()
        .expect("Failed to execute staffopt")
}

#[test]
fn init_creates_request_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("roster.json");

    let output = staffopt(&["init"], &file);

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created:"), "Should show 'Created:'");
    assert!(stdout.contains("roster.json"), "Should show filename");

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("\"people\""));
    assert!(content.contains("Person 1"));
    assert!(content.contains("Task 1"));
    assert!(content.contains("\"alpha\": 1.0"));
    assert!(content.contains("\"timelimit\": 60"));
    assert!(content.ends_with('\n'));
}

#[test]
fn init_refuses_overwrite() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("existing.json");
    fs::write(&file, "keep me").unwrap();

    let output = staffopt(&["init"], &file);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"), "stderr: {stderr}");
    assert_eq!(fs::read_to_string(&file).unwrap(), "keep me");
}

#[test]
fn init_force_overwrites() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("existing.json");
    fs::write(&file, "old").unwrap();

    let output = staffopt(&["init", "--force"], &file);

    assert!(output.status.success());
    assert!(fs::read_to_string(&file).unwrap().contains("Person 2"));
}

#[test]
fn init_output_passes_check() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("roster.json");
    assert!(staffopt(&["init"], &file).status.success());

    let output = staffopt(&["check"], &file);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("People:       2"));
    assert!(stdout.contains("Active hours: 4 (16h-19h)"));
    assert!(stdout.contains("Coverage pre-check: OK"));
}
