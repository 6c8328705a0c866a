//! File descriptor redirection for simple commands.
//!
//! Applies a command's `<`, `>` and `2>` lists to the current process.
//! Every listed file is opened (and, for outputs, created or truncated)
//! in order; only the last one in each list stays wired to the stream.
//! When the final stdout and stderr targets name the same file, both
//! streams share a single open descriptor so their writes interleave
//! instead of clobbering each other.
//!
//! Callers run this inside a forked child (or save and restore the
//! standard descriptors around it, as the `cd` builtin does).

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::os::unix::io::RawFd;
use std::path::PathBuf;

use nix::unistd::dup2;
use thiserror::Error;

use crate::ast::{IoMode, SimpleCommand};

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("cannot open '{path}': {source}")]
    Open { path: String, source: io::Error },
    #[error("cannot redirect to '{path}': {source}")]
    Dup {
        path: String,
        source: nix::errno::Errno,
    },
}

/// Apply all of a command's redirections to the current process.
pub fn apply(cmd: &SimpleCommand) -> Result<(), RedirectError> {
    for word in &cmd.stdin_redirects {
        let path = word.resolve();
        let file = File::open(&path).map_err(|source| RedirectError::Open {
            path: path.clone(),
            source,
        })?;
        dup_onto(&file, libc::STDIN_FILENO, &path)?;
    }

    // Remember the winning stdout target so stderr can share it.
    let mut retained: Option<(File, PathBuf)> = None;
    for word in &cmd.stdout_redirects {
        let path = word.resolve();
        let file = open_target(&path, cmd.io_mode)?;
        dup_onto(&file, libc::STDOUT_FILENO, &path)?;
        let canonical = std::fs::canonicalize(&path).unwrap_or_else(|_| PathBuf::from(&path));
        retained = Some((file, canonical));
    }

    for word in &cmd.stderr_redirects {
        let path = word.resolve();
        let canonical = std::fs::canonicalize(&path).unwrap_or_else(|_| PathBuf::from(&path));
        match &retained {
            // Same file as stdout: reuse its descriptor. Reopening
            // would truncate again and the two streams would overwrite
            // each other's bytes.
            Some((file, kept)) if *kept == canonical => {
                dup_onto(file, libc::STDERR_FILENO, &path)?;
            }
            _ => {
                let file = open_target(&path, cmd.io_mode)?;
                dup_onto(&file, libc::STDERR_FILENO, &path)?;
            }
        }
    }

    drop(retained);
    Ok(())
}

/// Open (creating or truncating/appending) an output redirection target.
fn open_target(path: &str, mode: IoMode) -> Result<File, RedirectError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    match mode {
        IoMode::Truncate => options.truncate(true),
        IoMode::Append => options.append(true),
    };
    options.open(path).map_err(|source| RedirectError::Open {
        path: path.to_string(),
        source,
    })
}

/// Point a standard descriptor at an open file.
fn dup_onto(file: &File, target: RawFd, path: &str) -> Result<(), RedirectError> {
    dup2(file.as_raw_fd(), target).map_err(|source| RedirectError::Dup {
        path: path.to_string(),
        source,
    })?;
    Ok(())
}
