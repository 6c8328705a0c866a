//! Parser for twig.
//!
//! Builds a command tree from the token stream. Precedence, loosest
//! first: `;`, then `&`, then `&&`/`||` (equal, left associative),
//! then `|`. Redirections attach to the simple command they follow.

use thiserror::Error;

use crate::ast::{Command, IoMode, SimpleCommand, Word, WordPart};
use crate::lexer::Token;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Expected a command")]
    ExpectedCommand,
    #[error("Expected a file name after '{0}'")]
    ExpectedRedirectTarget(&'static str),
    #[error("Unexpected token: {0:?}")]
    UnexpectedToken(Token),
    #[error("Empty input")]
    EmptyInput,
}

/// Parse a token stream into a command tree.
pub fn parse(tokens: Vec<Token>) -> Result<Command, ParseError> {
    let mut parser = Parser { tokens, pos: 0 };
    if parser.is_at_end() {
        return Err(ParseError::EmptyInput);
    }
    let command = parser.parse_sequence()?;
    match parser.peek() {
        None => Ok(command),
        Some(token) => Err(ParseError::UnexpectedToken(token.clone())),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// `a ; b ; c` - left associative, trailing `;` allowed
    fn parse_sequence(&mut self) -> Result<Command, ParseError> {
        let mut left = self.parse_parallel()?;
        while matches!(self.peek(), Some(Token::Semi)) {
            self.advance();
            if self.is_at_end() {
                break;
            }
            let right = self.parse_parallel()?;
            left = Command::Seq(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// `a & b`
    fn parse_parallel(&mut self) -> Result<Command, ParseError> {
        let mut left = self.parse_andor()?;
        while matches!(self.peek(), Some(Token::Background)) {
            self.advance();
            let right = self.parse_andor()?;
            left = Command::Parallel(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// `a && b || c` - equal precedence, left associative
    fn parse_andor(&mut self) -> Result<Command, ParseError> {
        let mut left = self.parse_pipeline()?;
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.advance();
                    let right = self.parse_pipeline()?;
                    left = Command::And(Box::new(left), Box::new(right));
                }
                Some(Token::Or) => {
                    self.advance();
                    let right = self.parse_pipeline()?;
                    left = Command::Or(Box::new(left), Box::new(right));
                }
                _ => break,
            }
        }
        Ok(left)
    }

    /// `a | b | c`
    fn parse_pipeline(&mut self) -> Result<Command, ParseError> {
        let mut left = self.parse_simple()?;
        while matches!(self.peek(), Some(Token::Pipe)) {
            self.advance();
            let right = self.parse_simple()?;
            left = Command::Pipe(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    /// One simple command: words plus any redirections, in any order.
    fn parse_simple(&mut self) -> Result<Command, ParseError> {
        let mut words: Vec<Word> = Vec::new();
        let mut cmd = SimpleCommand::default();

        loop {
            match self.peek() {
                Some(Token::Word(_)) => {
                    if let Some(Token::Word(word)) = self.advance() {
                        words.push(word);
                    }
                }
                Some(Token::RedirectIn) => {
                    self.advance();
                    cmd.stdin_redirects.push(self.expect_word("<")?);
                }
                Some(Token::RedirectOut) => {
                    self.advance();
                    cmd.stdout_redirects.push(self.expect_word(">")?);
                }
                Some(Token::RedirectAppend) => {
                    self.advance();
                    cmd.stdout_redirects.push(self.expect_word(">>")?);
                    cmd.io_mode = IoMode::Append;
                }
                Some(Token::RedirectErr) => {
                    self.advance();
                    cmd.stderr_redirects.push(self.expect_word("2>")?);
                }
                Some(Token::RedirectErrAppend) => {
                    self.advance();
                    cmd.stderr_redirects.push(self.expect_word("2>>")?);
                    cmd.io_mode = IoMode::Append;
                }
                Some(Token::RedirectBoth) => {
                    self.advance();
                    let target = self.expect_word("&>")?;
                    cmd.stdout_redirects.push(target.clone());
                    cmd.stderr_redirects.push(target);
                }
                _ => break,
            }
        }

        let mut words = words.into_iter();
        match words.next() {
            Some(first) => cmd.verb = split_assignment(first),
            None => return Err(ParseError::ExpectedCommand),
        }
        cmd.params = words.collect();
        Ok(Command::Simple(cmd))
    }

    fn expect_word(&mut self, operator: &'static str) -> Result<Word, ParseError> {
        match self.advance() {
            Some(Token::Word(word)) => Ok(word),
            Some(token) => Err(ParseError::UnexpectedToken(token)),
            None => Err(ParseError::ExpectedRedirectTarget(operator)),
        }
    }
}

/// Recognize `NAME=value` in a verb and split it into the
/// `[NAME, "=", value...]` shape the executor looks for. Anything that
/// does not match a valid name stays a plain word.
fn split_assignment(word: Word) -> Word {
    let (name, rest) = match word.parts.first() {
        Some(WordPart::Literal(text)) => match text.find('=') {
            Some(pos) if pos > 0 => (text[..pos].to_string(), text[pos + 1..].to_string()),
            _ => return word,
        },
        _ => return word,
    };
    let valid = !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if !valid {
        return word;
    }

    let mut parts = Vec::with_capacity(word.parts.len() + 2);
    parts.push(WordPart::Literal(name));
    parts.push(WordPart::Literal("=".to_string()));
    if !rest.is_empty() {
        parts.push(WordPart::Literal(rest));
    }
    parts.extend(word.parts.into_iter().skip(1));
    Word { parts }
}
