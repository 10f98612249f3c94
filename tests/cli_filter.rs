//! Integration tests driving the sift binary over fixture log files.
//!
//! These verify the end-to-end path: expression compilation, per-line
//! evaluation, and each output mode of the CLI.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const APP_LOG: &str = "\
2024-01-10 12:00:01 INFO service started
2024-01-10 12:00:02 DEBUG config loaded from /etc/app
2024-01-10 12:00:03 WARNING disk usage at 91%
2024-01-10 12:00:04 ERROR connection refused
2024-01-10 12:00:05 ERROR file not found: data.bin
2024-01-10 12:00:06 INFO retrying in 5s
2024-01-10 12:00:07 DEBUG error counter incremented
";

fn sift_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sift"))
}

/// Write the shared fixture log into a per-process temp directory
fn fixture_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("sift_test_fixtures")
        .join(format!("test_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("Failed to create fixture dir");
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn run_sift(args: &[&str]) -> Output {
    Command::new(sift_binary())
        .args(args)
        .output()
        .expect("Failed to run sift")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    assert!(
        output.status.success(),
        "sift failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_filters_matching_lines() {
    let log = fixture_file("filters.log", APP_LOG);
    let output = run_sift(&["error -debug", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("connection refused"));
    assert!(lines[1].contains("file not found"));
}

#[test]
fn test_or_and_group_expression() {
    let log = fixture_file("group.log", APP_LOG);
    let output = run_sift(&["(warning|error) -debug", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("disk usage"));
}

#[test]
fn test_quoted_phrase() {
    let log = fixture_file("phrase.log", APP_LOG);
    let output = run_sift(&["\"not found\"", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("data.bin"));
}

#[test]
fn test_no_matches_prints_nothing() {
    let log = fixture_file("nomatch.log", APP_LOG);
    let output = run_sift(&["nosuchword", log.to_str().unwrap()]);
    assert_eq!(stdout_lines(&output).len(), 0);
}

#[test]
fn test_count_mode() {
    let log = fixture_file("count.log", APP_LOG);
    let output = run_sift(&["--count", "error", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    // Case-insensitive: two ERROR lines plus the DEBUG "error counter" line
    assert_eq!(lines, vec!["3".to_string()]);
}

#[test]
fn test_invert_match() {
    let log = fixture_file("invert.log", APP_LOG);
    let output = run_sift(&["-v", "info|debug", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| !l.contains("INFO")));
    assert!(lines.iter().all(|l| !l.contains("DEBUG")));
}

#[test]
fn test_line_numbers() {
    let log = fixture_file("lineno.log", APP_LOG);
    let output = run_sift(&["-n", "warning", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("3:"), "got: {}", lines[0]);
}

#[test]
fn test_json_mode() {
    let log = fixture_file("json.log", APP_LOG);
    let output = run_sift(&["--json", "refused", log.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(&lines[0]).expect("invalid JSON");
    assert_eq!(record["line_number"], 4);
    let line = record["line"].as_str().unwrap();
    let (start, end) = (
        record["match_start"].as_u64().unwrap() as usize,
        record["match_end"].as_u64().unwrap() as usize,
    );
    assert_eq!(&line[start..end], "refused");
}

#[test]
fn test_reads_stdin_when_no_files() {
    let mut child = Command::new(sift_binary())
        .arg("error")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn sift");

    child
        .stdin
        .take()
        .expect("no stdin handle")
        .write_all(APP_LOG.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for sift");
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_multiple_files_prefix_paths() {
    let a = fixture_file("a.log", "alpha error\nquiet\n");
    let b = fixture_file("b.log", "bravo error\n");
    let output = run_sift(&["error", a.to_str().unwrap(), b.to_str().unwrap()]);
    let lines = stdout_lines(&output);

    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("a.log:"));
    assert!(lines[1].contains("b.log:"));
}

#[test]
fn test_degenerate_query_matches_everything() {
    let log = fixture_file("degenerate.log", APP_LOG);
    let output = run_sift(&["-", log.to_str().unwrap()]);
    // A lone '-' compiles to an empty query, which places no constraint
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), APP_LOG.lines().count());
}
