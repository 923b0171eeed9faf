//! CLI integration tests
//!
//! These tests run the built `geodsl` binary and check its stdout, stderr
//! and exit status.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn geodsl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geodsl"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path_str(&path)
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

#[test]
fn test_eval_prints_one_json_line_per_expression() {
    // When: `geodsl eval "Point(1, 2)" "Sum(1, 2, 3)"`
    let output = geodsl(&["eval", "Point(1, 2)", "Sum(1, 2, 3)"]);

    // Then: both results are printed as JSON
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert_eq!(
        stdout_lines(&output),
        vec![
            r#"[{"type":"Point","x":1,"y":2}]"#.to_string(),
            r#"[{"type":"Number","value":6}]"#.to_string(),
        ]
    );
}

#[test]
fn test_eval_shares_construction_between_expressions() {
    let output = geodsl(&["eval", "A = Point(1, 2)", "A = Point(3, 4)", "--elements"]);

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], r#"A = [{"type":"Point","x":3,"y":4}]"#);
}

#[test]
fn test_eval_failure_exits_nonzero() {
    let output = geodsl(&["eval", "Foo(1, 2)"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Error: UnknownCommand: Foo"));
}

#[test]
fn test_run_skips_comments_and_blank_lines() {
    // Given: a script with a comment, a blank line and two commands
    let temp_dir = TempDir::new().unwrap();
    let script = write_file(
        &temp_dir,
        "session.ggb",
        "# triangle corners\nA = Point(0, 0)\n\nB = Point(4, 0)\nd = Distance(A, B)\n",
    );

    // When: `geodsl run <script> --elements`
    let output = geodsl(&["run", &script, "--elements"]);

    // Then: three results and three bindings are printed
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[2],
        r#"[{"type":"Distance","obj1":"A","obj2":"B"}]"#
    );
    assert!(lines[3].starts_with("A = "));
    assert!(lines[5].starts_with("d = "));
}

#[test]
fn test_run_reports_failing_line_number() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_file(&temp_dir, "bad.ggb", "Point(1, 2)\nPoint(1, 2\nSum(1, 2)\n");

    let output = geodsl(&["run", &script]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("line 2: Unbalanced parentheses"));
    assert_eq!(stdout_lines(&output).len(), 1);
}

#[test]
fn test_run_keep_going_continues_after_failure() {
    let temp_dir = TempDir::new().unwrap();
    let script = write_file(&temp_dir, "bad.ggb", "Point(1, 2)\nPolygon(A, B, C)\nSum(1, 2)\n");

    let output = geodsl(&["run", &script, "--keep-going"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("line 2: Command Polygon not implemented"), "Stderr: {}", err);
    assert!(err.contains("1 line(s) failed"));
    assert_eq!(stdout_lines(&output).len(), 2);
}

#[test]
fn test_commands_by_category() {
    let output = geodsl(&["commands", "--category", "statistics"]);

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let lines = stdout_lines(&output);
    assert_eq!(&lines[..2], &["Sum".to_string(), "Mean".to_string()]);
}

#[test]
fn test_commands_unknown_category_fails() {
    let output = geodsl(&["commands", "--category", "Astrology"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown category: Astrology"));
}

#[test]
fn test_categories_listing() {
    let output = geodsl(&["commands", "--categories"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 20);
}

#[test]
fn test_syntax() {
    let output = geodsl(&["syntax", "Line"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["Line( <Point>, <Point> )".to_string()]);

    let output = geodsl(&["syntax", "line"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown command: line"));
}

#[test]
fn test_validate_reports_problems() {
    let output = geodsl(&["validate", "Point(1, 2)", "Bogus(x)"]);

    assert!(!output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["Bogus(x): Unknown command: Bogus".to_string()]
    );
    assert!(stderr(&output).contains("1 problem(s) found"));

    let output = geodsl(&["validate", "Point(1, 2)"]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["ok".to_string()]);
}

#[test]
fn test_profile_restricts_commands() {
    // Given: an exam profile allowing only Point
    let temp_dir = TempDir::new().unwrap();
    let profile = write_file(
        &temp_dir,
        "exam.toml",
        "[commands]\nallow = [\"Point\"]\n",
    );

    // When: a disallowed command is evaluated under it
    let output = geodsl(&["--profile", &profile, "eval", "Sum(1, 2)"]);

    // Then: the command is rejected
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Command 'Sum' is not allowed"));

    let output = geodsl(&["eval", "Point(5, 6)", "--profile", &profile]);
    assert!(output.status.success(), "Stderr: {}", stderr(&output));
}

#[test]
fn test_invalid_profile_fails_before_evaluation() {
    let temp_dir = TempDir::new().unwrap();
    let profile = write_file(&temp_dir, "bad.toml", "[commands]\nallow = [\"Teleport\"]\n");

    let output = geodsl(&["--profile", &profile, "eval", "Point(1, 2)"]);

    assert!(!output.status.success());
    assert!(stdout_lines(&output).is_empty());
    assert!(stderr(&output).contains("Invalid session profile: unknown command 'Teleport'"));
}
