//! CLI argument-surface tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_src_and_dst_are_required() {
    Command::cargo_bin("drivecopy")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--src-id"));
}

#[test]
fn test_help_lists_all_flags() {
    Command::cargo_bin("drivecopy")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--src-id"))
        .stdout(predicate::str::contains("--dst-id"))
        .stdout(predicate::str::contains("--new-name"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--include-trashed"))
        .stdout(predicate::str::contains("--credentials"))
        .stdout(predicate::str::contains("--token"));
}

#[test]
fn test_missing_token_cache_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("drivecopy")
        .unwrap()
        .current_dir(dir.path())
        .args(["--src-id", "src-folder", "--dst-id", "dst-folder"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("token.json"));
}
