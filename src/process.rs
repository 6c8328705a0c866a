//! Process plumbing: fork, wait, pipes, parallel pairs.
//!
//! Everything here is built on fork/waitpid. A child runs a closure and
//! turns its `ExitStatus` into a real process exit; the parent keeps a
//! `ChildHandle` it can wait on. Pipe and parallel nodes spawn one
//! child per side.

use std::io;
use std::os::unix::io::RawFd;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, fork, ForkResult, Pid};

use crate::ast::ExitStatus;

/// A forked child the parent has not yet waited on.
pub(crate) struct ChildHandle {
    pid: Pid,
}

/// Fork and run `run` in the child. The child never returns; it exits
/// with the status the closure produced. The parent gets a handle.
pub(crate) fn spawn<F>(run: F) -> Result<ChildHandle, Errno>
where
    F: FnOnce() -> ExitStatus,
{
    match unsafe { fork() }? {
        ForkResult::Child => {
            let status = run();
            std::process::exit(i32::from(status.exit_code()));
        }
        ForkResult::Parent { child } => Ok(ChildHandle { pid: child }),
    }
}

impl ChildHandle {
    /// Block until the child exits and report its status. A child
    /// killed by a signal reports 128 plus the signal number, matching
    /// the usual shell convention.
    pub(crate) fn wait(self) -> ExitStatus {
        loop {
            match waitpid(self.pid, None) {
                Ok(WaitStatus::Exited(_, code)) => return ExitStatus::Code(code as u8),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    return ExitStatus::Code(128u8.wrapping_add(signal as u8));
                }
                Ok(_) => continue,
                Err(_) => return ExitStatus::Code(1),
            }
        }
    }
}

/// Run two closures in concurrent child processes and wait for both.
/// True only if both exited 0.
pub(crate) fn run_parallel<L, R>(left: L, right: R) -> bool
where
    L: FnOnce() -> ExitStatus,
    R: FnOnce() -> ExitStatus,
{
    let first = match spawn(left) {
        Ok(child) => child,
        Err(err) => {
            eprintln!("twig: fork: {err}");
            return false;
        }
    };
    let second = match spawn(right) {
        Ok(child) => child,
        Err(err) => {
            eprintln!("twig: fork: {err}");
            let _ = first.wait();
            return false;
        }
    };
    let left_status = first.wait();
    let right_status = second.wait();
    left_status.success() && right_status.success()
}

/// Run two closures connected by a pipe: the first's stdout feeds the
/// second's stdin. True if the second side exited 0; the first side's
/// status is ignored, as in most shells.
pub(crate) fn run_pipe<L, R>(left: L, right: R) -> bool
where
    L: FnOnce() -> ExitStatus,
    R: FnOnce() -> ExitStatus,
{
    let mut fds: [RawFd; 2] = [0; 2];
    if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
        eprintln!("twig: pipe: {}", io::Error::last_os_error());
        return false;
    }
    let (read_end, write_end) = (fds[0], fds[1]);

    let writer = spawn(move || {
        let _ = close(read_end);
        if dup2(write_end, libc::STDOUT_FILENO).is_err() {
            return ExitStatus::Code(1);
        }
        let _ = close(write_end);
        left()
    });
    let writer = match writer {
        Ok(child) => child,
        Err(err) => {
            eprintln!("twig: fork: {err}");
            let _ = close(read_end);
            let _ = close(write_end);
            return false;
        }
    };

    let reader = spawn(move || {
        let _ = close(write_end);
        if dup2(read_end, libc::STDIN_FILENO).is_err() {
            return ExitStatus::Code(1);
        }
        let _ = close(read_end);
        right()
    });

    // The parent's copies must go away or the reader never sees EOF.
    let _ = close(read_end);
    let _ = close(write_end);

    let reader = match reader {
        Ok(child) => child,
        Err(err) => {
            eprintln!("twig: fork: {err}");
            let _ = writer.wait();
            return false;
        }
    };

    let _ = writer.wait();
    reader.wait().success()
}
