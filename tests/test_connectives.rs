//! Sequencing and conditional connectives, run through the binary.

#[path = "common/mod.rs"]
mod common;
use common::twig;

#[test]
fn and_skips_right_when_left_fails() {
    twig("false && echo hi").assert().code(1).stdout("");
}

#[test]
fn and_runs_right_when_left_succeeds() {
    twig("true && echo hi").assert().success().stdout("hi\n");
}

#[test]
fn or_skips_right_when_left_succeeds() {
    twig("true || echo hi").assert().success().stdout("");
}

#[test]
fn or_runs_right_when_left_fails() {
    twig("false || echo hi").assert().success().stdout("hi\n");
}

#[test]
fn seq_status_is_the_rightmost() {
    twig("false ; true").assert().success();
    twig("true ; false").assert().code(1);
}

#[test]
fn seq_runs_both_sides() {
    twig("echo one ; echo two")
        .assert()
        .success()
        .stdout("one\ntwo\n");
}

#[test]
fn exit_code_propagates_from_child() {
    twig("sh -c 'exit 7'").assert().code(7);
}

#[test]
fn chained_conditionals() {
    twig("false && echo a || echo b")
        .assert()
        .success()
        .stdout("b\n");
    twig("true && echo a || echo b")
        .assert()
        .success()
        .stdout("a\n");
}
