//! Redirection behavior, observed through real files.

#[path = "common/mod.rs"]
mod common;
use common::twig;

use predicates::prelude::*;

#[test]
fn stdout_redirect_truncates() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("out.txt"), "stale\n").unwrap();

    twig("echo hi > out.txt")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "hi\n"
    );
}

#[test]
fn append_accumulates_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    twig("echo one >> log.txt")
        .current_dir(dir.path())
        .assert()
        .success();
    twig("echo two >> log.txt")
        .current_dir(dir.path())
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("log.txt")).unwrap(),
        "one\ntwo\n"
    );
}

#[test]
fn stdin_redirect_feeds_the_command() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lines.txt"), "x\ny\n").unwrap();

    let output = twig("wc -l < lines.txt")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2");
}

#[test]
fn every_target_is_created_but_the_last_wins() {
    let dir = tempfile::tempdir().unwrap();
    twig("echo hi > a.txt > b.txt")
        .current_dir(dir.path())
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("a.txt")).unwrap(),
        ""
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("b.txt")).unwrap(),
        "hi\n"
    );
}

#[test]
fn stderr_redirect_captures_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    twig("sh -c 'echo oops 1>&2' 2> err.txt")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("err.txt")).unwrap(),
        "oops\n"
    );
}

#[test]
fn shared_out_and_err_target_keeps_both_streams() {
    let dir = tempfile::tempdir().unwrap();
    twig("sh -c 'echo from-out; echo from-err 1>&2' > both.txt 2> both.txt")
        .current_dir(dir.path())
        .assert()
        .success();
    let contents = std::fs::read_to_string(dir.path().join("both.txt")).unwrap();
    assert!(contents.contains("from-out"), "missing stdout in {contents:?}");
    assert!(contents.contains("from-err"), "missing stderr in {contents:?}");
}

#[test]
fn redirect_both_sends_out_and_err_together() {
    let dir = tempfile::tempdir().unwrap();
    twig("sh -c 'echo from-out; echo from-err 1>&2' &> all.txt")
        .current_dir(dir.path())
        .assert()
        .success();
    let contents = std::fs::read_to_string(dir.path().join("all.txt")).unwrap();
    assert!(contents.contains("from-out"));
    assert!(contents.contains("from-err"));
}

#[test]
fn missing_input_file_fails_the_command() {
    twig("wc -l < /twig/no/such/input")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot open"));
}
