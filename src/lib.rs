//! twig - a tiny tree-walking shell
//!
//! # Overview
//!
//! twig parses a line of shell-like syntax into a binary command tree
//! and evaluates it with fork/exec. It understands the classic
//! connectives and redirections:
//!
//! ```text
//! cmd args...          # fork + execvp
//! a ; b                # run a, then b; status is b's
//! a && b               # run b only if a exited 0
//! a || b               # run b only if a exited nonzero
//! a | b                # a's stdout feeds b's stdin
//! a & b                # a and b run concurrently
//! cmd < in > out 2> e  # redirections (>> and 2>> append, &> both)
//! NAME=value           # set a shell variable
//! ```
//!
//! Builtins: `cd` (with `-` and bare `cd` to `$HOME`), `pwd`, `exit`,
//! `quit`, and `NAME=value` assignments. Words may mix literal text,
//! quotes and `$VAR` references; variables resolve when the command
//! runs.
//!
//! # Example
//!
//! ```rust
//! use twig::{lex, parse, evaluate};
//!
//! let tokens = lex("GREETING=hello").unwrap();
//! let tree = parse(tokens).unwrap();
//! let status = evaluate(&tree);
//! assert!(status.success());
//! ```

pub mod ast;
pub mod eval;
mod exec;
pub mod lexer;
pub mod parser;
mod process;
pub mod redirect;
mod word;

// Re-export commonly used items
pub use ast::{Command, ExitStatus, IoMode, SimpleCommand, Word, WordPart};
pub use eval::evaluate;
pub use lexer::{lex, LexError, Token};
pub use parser::{parse, ParseError};
pub use redirect::RedirectError;

/// Convenience function to run one line of input. A blank line is a
/// successful no-op.
pub fn run(input: &str) -> Result<ExitStatus, String> {
    let tokens = lex(input).map_err(|e| e.to_string())?;
    if tokens.is_empty() {
        return Ok(ExitStatus::SUCCESS);
    }
    let tree = parse(tokens).map_err(|e| e.to_string())?;
    Ok(evaluate(&tree))
}
