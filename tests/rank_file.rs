//! End-to-end tests for the `rank-file` tool binary

use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn demo_board() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("demos/board.json")
        .display()
        .to_string()
}

fn rank_file(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rank-file"))
        .args(args)
        .output()
        .expect("failed to run rank-file")
}

fn json_rows(output: &Output) -> Vec<Value> {
    assert!(
        output.status.success(),
        "rank-file failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice::<Value>(&output.stdout)
        .unwrap()
        .as_array()
        .cloned()
        .unwrap()
}

fn column(rows: &[Value], name: &str) -> Vec<String> {
    rows.iter()
        .map(|row| match &row[name] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

#[test]
fn test_records_as_json() {
    let board = demo_board();
    let rows = json_rows(&rank_file(&["records", "--file", &board, "--json"]));

    assert_eq!(
        column(&rows, "identifier"),
        vec!["alpha", "bravo", "charlie", "delta", "echo"]
    );
    assert_eq!(column(&rows, "rank"), vec!["1", "1", "3", "4", "4"]);
    assert_eq!(column(&rows, "rank_label"), vec!["T1", "T1", "3", "T4", "T4"]);
    assert_eq!(rows[1]["medal"], "gold");
    assert_eq!(rows[2]["medal"], "bronze");
    assert!(rows[3].get("medal").is_none());
}

#[test]
fn test_records_as_table() {
    let board = demo_board();
    let output = rank_file(&["records", "--file", &board, "--mode", "monthly"]);

    assert!(output.status.success());
    let table = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert!(lines[0].contains("Completion %"));
    assert!(lines[2].starts_with("T1"));
    assert!(lines[2].contains("gold"));
    assert!(lines[2].contains("alpha"));
    assert!(lines[4].starts_with('3'));
    assert_eq!(lines.len(), 2 + 5);
}

#[test]
fn test_stats_with_yearly_tie_break() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"[
            {{ "user": "ann", "points": 10.0, "completed_achievements": 1 }},
            {{ "user": "ben", "points": 10.0, "completed_achievements": 5 }},
            {{ "user": "cat", "points": 3.0 }}
        ]"#
    )
    .unwrap();
    let path = file.path().display().to_string();

    let rows = json_rows(&rank_file(&[
        "stats", "--file", &path, "--mode", "yearly", "--json",
    ]));
    assert_eq!(column(&rows, "identifier"), vec!["ann", "ben", "cat"]);
    assert_eq!(column(&rows, "rank"), vec!["1", "1", "3"]);

    let rows = json_rows(&rank_file(&[
        "stats",
        "--file",
        &path,
        "--mode",
        "yearly",
        "--yearly-tie-break",
        "--json",
    ]));
    assert_eq!(column(&rows, "identifier"), vec!["ben", "ann", "cat"]);
    assert_eq!(column(&rows, "rank"), vec!["1", "2", "3"]);
}

#[test]
fn test_invalid_input_fails() {
    let board = demo_board();
    let output = rank_file(&["records", "--file", &board, "--mode", "weekly"]);
    assert!(!output.status.success());

    let output = rank_file(&["records", "--file", "/nonexistent/board.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn test_empty_file_prints_notice() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[]").unwrap();
    let path = file.path().display().to_string();

    let output = rank_file(&["records", "--file", &path]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "No participants to rank"
    );
}
