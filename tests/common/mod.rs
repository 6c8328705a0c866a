//! Common test utilities for twig integration tests

use assert_cmd::Command;

/// A twig invocation running one command line via `-c`
pub fn twig(line: &str) -> Command {
    let mut cmd = Command::cargo_bin("twig").unwrap();
    cmd.arg("-c").arg(line);
    cmd
}

/// Run a line and return its trimmed stdout
#[allow(dead_code)]
pub fn stdout_of(line: &str) -> String {
    let output = twig(line).output().unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
