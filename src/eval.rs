//! The tree-walking evaluator.
//!
//! Evaluation is a single recursive walk. Operator nodes decide which
//! children run and in which process; leaves hand off to the executor.

use crate::ast::{Command, ExitStatus};
use crate::exec;
use crate::process;

/// Evaluate a command tree and report the status of the whole thing.
pub fn evaluate(cmd: &Command) -> ExitStatus {
    match cmd {
        Command::Simple(simple) => exec::run_simple(simple),
        Command::Seq(left, right) => {
            // Left's status is discarded but its side effects happen.
            let _ = evaluate(left);
            evaluate(right)
        }
        Command::And(left, right) => {
            let status = evaluate(left);
            if status.success() {
                evaluate(right)
            } else {
                status
            }
        }
        Command::Or(left, right) => {
            let status = evaluate(left);
            if status.success() {
                status
            } else {
                evaluate(right)
            }
        }
        Command::Parallel(left, right) => {
            if process::run_parallel(|| evaluate(left), || evaluate(right)) {
                ExitStatus::SUCCESS
            } else {
                ExitStatus::Code(1)
            }
        }
        Command::Pipe(left, right) => {
            if process::run_pipe(|| evaluate(left), || evaluate(right)) {
                ExitStatus::SUCCESS
            } else {
                ExitStatus::Code(1)
            }
        }
    }
}
