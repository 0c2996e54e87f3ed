//! End-to-end runs of the `sheetlint` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn sheetlint(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sheetlint"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_clean_project_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), ".a { color: red; }\n").unwrap();

    let output = sheetlint(dir.path(), &["--no-progress"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("No problems found in 1 file"));
}

#[test]
fn test_warnings_only_exit_zero() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), ".a { margin: 0px; }\n").unwrap();

    let output = sheetlint(dir.path(), &["-f", "machine"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output).trim(),
        "./a.scss:1:14: [warning] zero-needs-no-unit Zero needs no unit; write `0` instead of `0px`"
    );
}

#[test]
fn test_errors_exit_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), "#main-navigation ul { color: red; }\n").unwrap();
    fs::write(dir.path().join("b.css"), ".b {\n").unwrap();

    let output = sheetlint(dir.path(), &["-f", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["total_errors"], 2);
    assert_eq!(json["stats"]["unchecked_files"], 1);
}

#[test]
fn test_config_error_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), ".a {}\n").unwrap();
    fs::write(
        dir.path().join(".sheetlintrc.json"),
        r#"{"no-such-rule": "error"}"#,
    )
    .unwrap();

    let output = sheetlint(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown rule `no-such-rule`"));
}

#[test]
fn test_missing_path_exits_four() {
    let dir = tempfile::tempdir().unwrap();
    let output = sheetlint(dir.path(), &["missing"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_config_controls_rules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), "#a { margin: 0px; }\n").unwrap();
    fs::write(
        dir.path().join("sheetlint.toml"),
        "[rules]\nno-id-selector = false\nzero-needs-no-unit = \"error\"\n",
    )
    .unwrap();

    let output = sheetlint(dir.path(), &["-f", "machine"]);
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(!out.contains("no-id-selector"));
    assert!(out.contains("[error] zero-needs-no-unit"));
}

#[test]
fn test_fix_rewrites_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.scss");
    fs::write(&path, ".a { margin: 0px; }\n").unwrap();

    let output = sheetlint(dir.path(), &["--fix", "--no-progress"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&path).unwrap(), ".a { margin: 0; }\n");
    assert!(stdout(&output).contains("Fixed 1 issue(s)"));
}

#[test]
fn test_rules_subcommand_lists_registry() {
    let dir = tempfile::tempdir().unwrap();
    let output = sheetlint(dir.path(), &["rules", "-f", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let rules: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rules.len(), 8);
}

#[test]
fn test_human_output_is_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.scss"), "#a { margin: 0px; }\n").unwrap();
    fs::write(dir.path().join("b.css"), ".b div { color: red; }\n").unwrap();

    let first = sheetlint(dir.path(), &["--no-progress"]);
    let second = sheetlint(dir.path(), &["--no-progress"]);
    assert_eq!(first.stdout, second.stdout);
    assert!(!stdout(&first).contains("files in"));

    let stderr = String::from_utf8(first.stderr).unwrap();
    assert!(stderr.contains("2 files in"));
}
