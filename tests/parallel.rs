//! Tests for parallel CLI processing of multiple files.

use std::fs;

use tempfile::tempdir;

#[macro_use]
mod prelude;
use prelude::*;

#[rstest]
fn test_cli_parallel_multiple_files() {
    let dir = tempdir().expect("failed to create temporary directory");
    let mut files = Vec::new();
    let mut expected = String::new();
    for i in 0..4 {
        let path = dir.path().join(format!("file{i}.md"));
        let source = doc![format!("# Title {i}"), format!("- item {i}")];
        fs::write(&path, &source).expect("failed to write file");
        expected.push_str(&markrite::transform(&source));
        expected.push('\n');
        files.push(path);
    }

    let mut cmd = Command::cargo_bin("markrite").expect("failed to create command");
    for path in &files {
        cmd.arg(path);
    }
    let output = cmd.output().expect("failed to run command");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
}

#[rstest]
fn test_cli_parallel_missing_file_error() {
    let dir = tempdir().expect("failed to create temporary directory");
    let good = dir.path().join("good.md");
    fs::write(&good, "*bold*").expect("failed to write file");
    let missing = dir.path().join("missing.md");

    let output = Command::cargo_bin("markrite")
        .expect("failed to create command")
        .arg(&good)
        .arg(&missing)
        .output()
        .expect("failed to run command");

    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<strong>bold</strong>\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.md"));
}

#[rstest]
fn test_cli_parallel_write_skips_missing_file() {
    let dir = tempdir().expect("failed to create temporary directory");
    let good = dir.path().join("good.md");
    fs::write(&good, "~gone~").expect("failed to write file");
    let missing = dir.path().join("missing.md");

    let output = Command::cargo_bin("markrite")
        .expect("failed to create command")
        .arg("--write")
        .arg(&good)
        .arg(&missing)
        .output()
        .expect("failed to run command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.md"));
    let written = fs::read_to_string(dir.path().join("good.html")).expect("output written");
    assert_eq!(written, "<del>gone</del>\n");
}
