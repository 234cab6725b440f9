mod common;
use common::*;

use std::path::{Path, PathBuf};
use std::process::Output;

/// A scratch project root holding one source file. The `.git` marker keeps
/// config discovery inside the directory.
fn project(source: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join(".git")).unwrap();
    let file = dir.path().join("A.java");
    std::fs::write(&file, source).unwrap();
    (dir, file)
}

fn run(file: &Path, args: &[&str]) -> Output {
    assistc().arg("complete").arg(file).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const SOURCE: &str = "class A {\n  void m() { foo(s.le); }\n  void n() { bar(); }\n}\n";

// ============================================================
// complete
// ============================================================

#[test]
fn tree_output_with_completion_and_parent() {
    let (_dir, file) = project(SOURCE);
    let output = run(&file, &["--behind", "s.le"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("foo(<CompleteOnName:s.le>);"), "{out}");
    assert!(out.contains("bar();"), "{out}");
    assert!(out.contains("-- completion: <CompleteOnName:s.le>\n"), "{out}");
    assert!(out.contains("-- parent: foo(<CompleteOnName:s.le>)\n"), "{out}");
}

#[test]
fn offset_and_behind_agree() {
    let (_dir, file) = project(SOURCE);
    let offset = cursor_behind(SOURCE, "s.le").to_string();
    let by_offset = run(&file, &["--offset", &offset]);
    let by_marker = run(&file, &["--behind", "s.le"]);
    assert_eq!(stdout(&by_offset), stdout(&by_marker));
}

#[test]
fn diet_mode_flag_skips_other_bodies() {
    let (_dir, file) = project(SOURCE);
    let out = stdout(&run(&file, &["--behind", "s.le", "--mode", "diet"]));
    assert!(out.contains("<CompleteOnName:s.le>"), "{out}");
    assert!(!out.contains("bar();"), "{out}");
}

#[test]
fn no_completion_is_reported() {
    let (_dir, file) = project("class A {\n  void m() { }\n}\n");
    let output = run(&file, &["--behind", "{ "]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("-- no completion\n"), "{}", stdout(&output));
}

#[test]
fn json_output() {
    let (_dir, file) = project(SOURCE);
    let output = run(&file, &["--behind", "s.le", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let completion = &report["completion"];
    assert_eq!(completion["tag"], "CompleteOnName");
    assert_eq!(completion["node"], "<CompleteOnName:s.le>");
    assert_eq!(completion["token"], "le");
    assert_eq!(completion["replaced_source"], "s.le");
    assert_eq!(completion["parent"]["kind"], "expression");
    assert!(report["tree"].as_str().unwrap().contains("bar();"));
}

#[test]
fn config_file_is_discovered() {
    let (dir, file) = project(SOURCE);
    std::fs::write(dir.path().join("assist.toml"), "[parse]\nmode = \"diet\"\n[output]\nparent = false\n").unwrap();
    let out = stdout(&run(&file, &["--behind", "s.le"]));
    assert!(!out.contains("bar();"), "{out}");
    assert!(!out.contains("-- parent:"), "{out}");
}

#[test]
fn flags_override_config() {
    let (dir, file) = project(SOURCE);
    std::fs::write(dir.path().join("assist.toml"), "[parse]\nmode = \"diet\"\n").unwrap();
    let out = stdout(&run(&file, &["--behind", "s.le", "--mode", "method"]));
    assert!(out.contains("bar();"), "{out}");
}

#[test]
fn invalid_config_fails() {
    let (dir, file) = project(SOURCE);
    std::fs::write(dir.path().join("assist.toml"), "[parse]\nmode = \"fast\"\n").unwrap();
    let output = run(&file, &["--behind", "s.le"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[config]"), "{}", stderr(&output));
}

#[test]
fn cursor_in_literal_fails_with_reason_code() {
    let (_dir, file) = project("class A {\n  int x = 12345;\n}\n");
    let output = run(&file, &["--behind", "123"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("NO_COMPLETION_INSIDE_NUMBER"), "{}", stderr(&output));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_marker_fails() {
    let (_dir, file) = project(SOURCE);
    let output = run(&file, &["--behind", "zzz"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not occur"), "{}", stderr(&output));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir.path().join("Nope.java"), &["--offset", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error[io]"), "{}", stderr(&output));
}

// ============================================================
// tokens
// ============================================================

#[test]
fn tokens_lists_tokens_and_comments() {
    let (_dir, file) = project("class A {} // tail\n");
    let output = assistc().arg("tokens").arg(&file).output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Class \"class\""), "{out}");
    assert!(out.contains("Ident \"A\""), "{out}");
    assert!(out.contains("comment"), "{out}");
}
