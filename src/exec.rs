//! Execution of simple commands: builtins, assignments, externals.
//!
//! `cd`, `exit`/`quit` and `NAME=value` assignments run in the shell
//! process itself, since their whole point is to mutate it. Everything
//! else (including `pwd`) runs in a forked child so redirections apply
//! uniformly and never leak back into the shell.

use std::env;
use std::ffi::CString;
use std::os::unix::io::RawFd;

use nix::unistd::{close, dup, dup2, execvp};

use crate::ast::{ExitStatus, SimpleCommand};
use crate::process;
use crate::redirect;

/// Run one simple command and report its status.
pub fn run_simple(cmd: &SimpleCommand) -> ExitStatus {
    if cmd.verb.is_assignment() {
        return match cmd.verb.assignment() {
            Some((name, value)) => {
                env::set_var(name, value);
                ExitStatus::SUCCESS
            }
            None => ExitStatus::Code(1),
        };
    }

    let name = cmd.verb.resolve();
    match name.as_str() {
        "cd" => run_cd(cmd),
        // An OS-level exit, so it also unwinds when `exit` sits inside
        // a pipe or parallel child.
        "exit" | "quit" => std::process::exit(0),
        _ => run_external(cmd, &name),
    }
}

/// The `cd` builtin. Runs in the shell process; redirections are
/// applied for the duration and then undone. A failed chdir is silent,
/// it just reports a nonzero status.
fn run_cd(cmd: &SimpleCommand) -> ExitStatus {
    let saved = match SavedStdio::capture() {
        Ok(saved) => saved,
        Err(err) => {
            eprintln!("twig: cd: {err}");
            return ExitStatus::Code(1);
        }
    };
    let outcome = redirect::apply(cmd).map(|()| change_directory(cmd));
    saved.restore();
    match outcome {
        Ok(true) => ExitStatus::SUCCESS,
        Ok(false) => ExitStatus::Code(1),
        Err(err) => {
            eprintln!("twig: cd: {err}");
            ExitStatus::Code(1)
        }
    }
}

/// Pick the target directory and attempt the change.
fn change_directory(cmd: &SimpleCommand) -> bool {
    let target = match cmd.params.first() {
        None => match env::var("HOME") {
            Ok(home) => home,
            Err(_) => return false,
        },
        Some(word) => {
            let path = word.resolve();
            if path == "-" {
                match env::var("OLDPWD") {
                    Ok(prev) => prev,
                    Err(_) => return false,
                }
            } else {
                path
            }
        }
    };
    env::set_current_dir(target).is_ok()
}

/// Duplicates of the standard descriptors, for restoring after a
/// builtin ran with redirections in place.
struct SavedStdio {
    stdin: RawFd,
    stdout: RawFd,
    stderr: RawFd,
}

impl SavedStdio {
    fn capture() -> Result<SavedStdio, nix::errno::Errno> {
        let stdin = dup(libc::STDIN_FILENO)?;
        let stdout = match dup(libc::STDOUT_FILENO) {
            Ok(fd) => fd,
            Err(err) => {
                let _ = close(stdin);
                return Err(err);
            }
        };
        let stderr = match dup(libc::STDERR_FILENO) {
            Ok(fd) => fd,
            Err(err) => {
                let _ = close(stdin);
                let _ = close(stdout);
                return Err(err);
            }
        };
        Ok(SavedStdio {
            stdin,
            stdout,
            stderr,
        })
    }

    fn restore(self) {
        let _ = dup2(self.stdin, libc::STDIN_FILENO);
        let _ = dup2(self.stdout, libc::STDOUT_FILENO);
        let _ = dup2(self.stderr, libc::STDERR_FILENO);
        let _ = close(self.stdin);
        let _ = close(self.stdout);
        let _ = close(self.stderr);
    }
}

/// Fork and run an external program (or the forked `pwd` builtin).
fn run_external(cmd: &SimpleCommand, name: &str) -> ExitStatus {
    let argv = cmd.argv();
    let child = process::spawn(move || {
        if let Err(err) = redirect::apply(cmd) {
            eprintln!("twig: {err}");
            return ExitStatus::Code(1);
        }
        if name == "pwd" {
            // Built into the child rather than the shell so its output
            // honors the command's redirections like any other program.
            return match env::current_dir() {
                Ok(dir) => {
                    println!("{}", dir.display());
                    ExitStatus::SUCCESS
                }
                Err(_) => ExitStatus::Code(1),
            };
        }
        exec_program(name, &argv)
    });
    match child {
        Ok(child) => child.wait(),
        Err(err) => {
            eprintln!("twig: fork: {err}");
            ExitStatus::TerminateShell
        }
    }
}

/// Replace the child's image with the named program. Only returns if
/// exec failed.
fn exec_program(name: &str, argv: &[String]) -> ExitStatus {
    let Ok(program) = CString::new(name) else {
        eprintln!("Execution failed for '{name}'");
        return ExitStatus::Code(127);
    };
    let mut args = Vec::with_capacity(argv.len());
    for arg in argv {
        let Ok(arg) = CString::new(arg.as_str()) else {
            eprintln!("Execution failed for '{name}'");
            return ExitStatus::Code(127);
        };
        args.push(arg);
    }
    let _ = execvp(&program, &args);
    eprintln!("Execution failed for '{name}'");
    ExitStatus::Code(127)
}
