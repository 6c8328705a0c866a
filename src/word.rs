//! Word resolution against the process environment.
//!
//! Words stay symbolic until the moment a command runs; resolution
//! concatenates literal parts with the current values of variable
//! parts. An unset variable contributes the empty string.

use std::env;

use crate::ast::{SimpleCommand, Word, WordPart};

impl Word {
    /// Resolve this word to a plain string.
    pub fn resolve(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                WordPart::Literal(text) => out.push_str(text),
                WordPart::Variable(name) => {
                    if let Ok(value) = env::var(name) {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }

    /// True if this word has the split `NAME = value...` shape the
    /// parser produces for assignments in verb position.
    pub fn is_assignment(&self) -> bool {
        matches!(self.parts.get(1), Some(WordPart::Literal(eq)) if eq == "=")
    }

    /// Extract `(name, resolved value)` from an assignment word.
    ///
    /// Returns `None` if the word is not an assignment or the name is
    /// empty.
    pub fn assignment(&self) -> Option<(String, String)> {
        if !self.is_assignment() {
            return None;
        }
        let name = match self.parts.first() {
            Some(WordPart::Literal(name)) if !name.is_empty() => name.clone(),
            _ => return None,
        };
        let value = Word {
            parts: self.parts[2..].to_vec(),
        }
        .resolve();
        Some((name, value))
    }
}

impl SimpleCommand {
    /// Resolve verb and params into an argv vector.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(1 + self.params.len());
        argv.push(self.verb.resolve());
        for param in &self.params {
            argv.push(param.resolve());
        }
        argv
    }
}
