//! Command tree for twig
//!
//! The parser produces a binary tree of commands joined by shell
//! operators; the evaluator walks it. Leaves are simple commands,
//! internal nodes own their two children outright, so the whole thing
//! is a plain sum type with no sharing and no cycles. The tree is
//! read-only during evaluation.

/// One segment of a word: literal text or a variable reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Literal text, including quoted sections.
    Literal(String),
    /// A `$NAME` or `${NAME}` reference, resolved against the process
    /// environment at execution time.
    Variable(String),
}

/// A word as written on the command line: an ordered list of parts.
///
/// `a$HOME/b` becomes `[Literal("a"), Variable("HOME"), Literal("/b")]`.
/// A `NAME=value` word in verb position is split by the parser into
/// `[Literal(NAME), Literal("="), ...value parts...]` so the executor
/// can recognize the assignment shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    /// A word consisting of a single literal segment.
    pub fn literal(text: impl Into<String>) -> Self {
        Word {
            parts: vec![WordPart::Literal(text.into())],
        }
    }
}

/// Whether output redirections truncate or append their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    #[default]
    Truncate,
    Append,
}

/// A single command with its arguments and redirection lists.
///
/// Each redirection list is ordered as written; `cmd > a > b` yields two
/// entries in `stdout_redirects` and the last one wins (every file is
/// still opened, see the redirect module).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleCommand {
    /// The command name (or `NAME=value` assignment, in split form).
    pub verb: Word,
    /// Arguments, excluding the verb.
    pub params: Vec<Word>,
    /// `<` targets.
    pub stdin_redirects: Vec<Word>,
    /// `>` / `>>` targets.
    pub stdout_redirects: Vec<Word>,
    /// `2>` / `2>>` targets (`&>` adds to both lists).
    pub stderr_redirects: Vec<Word>,
    /// Truncate or append, applied to both output and error opens.
    pub io_mode: IoMode,
}

/// A node in the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A leaf: one simple command.
    Simple(SimpleCommand),
    /// `left ; right` - run left, discard its status, run right.
    Seq(Box<Command>, Box<Command>),
    /// `left && right` - run right only if left exited 0.
    And(Box<Command>, Box<Command>),
    /// `left || right` - run right only if left exited nonzero.
    Or(Box<Command>, Box<Command>),
    /// `left | right` - left's stdout feeds right's stdin.
    Pipe(Box<Command>, Box<Command>),
    /// `left & right` - both run concurrently in their own processes.
    Parallel(Box<Command>, Box<Command>),
}

/// The outcome of evaluating a command tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// An ordinary exit code in 0..=255.
    Code(u8),
    /// The hosting read-eval loop should stop. Produced when process
    /// creation fails outright; the `exit` builtin never returns this,
    /// it terminates the process directly.
    TerminateShell,
}

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus::Code(0);

    /// True only for exit code 0.
    pub fn success(self) -> bool {
        matches!(self, ExitStatus::Code(0))
    }

    /// Collapse to a process exit code.
    pub fn exit_code(self) -> u8 {
        match self {
            ExitStatus::Code(code) => code,
            ExitStatus::TerminateShell => 1,
        }
    }
}
