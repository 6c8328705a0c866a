//! Tokenization for twig.
//!
//! The lexer turns a line of input into operator tokens and words.
//! Words are kept in parts (literal runs, quoted sections, `$VAR`
//! references) so variable resolution can happen at execution time
//! rather than here.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, value},
    multi::{many0, many1},
    sequence::{delimited, preceded, terminated},
    IResult,
};
use thiserror::Error;

use crate::ast::{Word, WordPart};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A word (command name, argument, redirection target)
    Word(Word),
    /// ;
    Semi,
    /// & (parallel, but not &&)
    Background,
    /// &&
    And,
    /// ||
    Or,
    /// |
    Pipe,
    /// <
    RedirectIn,
    /// >
    RedirectOut,
    /// >>
    RedirectAppend,
    /// 2>
    RedirectErr,
    /// 2>>
    RedirectErrAppend,
    /// &> (both stdout and stderr)
    RedirectBoth,
}

#[derive(Error, Debug)]
pub enum LexError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Parse error: {0}")]
    ParseError(String),
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Characters that end a bare (unquoted) word segment.
fn is_word_terminator(c: char) -> bool {
    c.is_whitespace()
        || c == '"'
        || c == '\''
        || c == '$'
        || c == ';'
        || c == '&'
        || c == '|'
        || c == '<'
        || c == '>'
}

/// Parse a variable reference: $VAR or ${VAR}
fn variable(input: &str) -> IResult<&str, Vec<WordPart>> {
    map(
        alt((
            preceded(tag("${"), terminated(take_while1(is_identifier_char), char('}'))),
            preceded(char('$'), take_while1(is_identifier_char)),
        )),
        |name: &str| vec![WordPart::Variable(name.to_string())],
    )(input)
}

/// A `$` that starts neither a variable nor `${...}` is literal
fn lone_dollar(input: &str) -> IResult<&str, Vec<WordPart>> {
    value(vec![WordPart::Literal("$".to_string())], char('$'))(input)
}

/// Parse a single-quoted section: everything inside is literal
fn single_quoted(input: &str) -> IResult<&str, Vec<WordPart>> {
    map(
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        |content: &str| vec![WordPart::Literal(content.to_string())],
    )(input)
}

/// Parse a double-quoted section; `$VAR` still resolves inside
fn double_quoted(input: &str) -> IResult<&str, Vec<WordPart>> {
    delimited(
        char('"'),
        many0(alt((
            map(take_while1(|c| c != '"' && c != '$'), |run: &str| {
                WordPart::Literal(run.to_string())
            }),
            map(variable, |mut parts| parts.remove(0)),
            map(char('$'), |_| WordPart::Literal("$".to_string())),
        ))),
        char('"'),
    )(input)
}

/// Parse a run of plain (unquoted, unspecial) characters
fn bare_segment(input: &str) -> IResult<&str, Vec<WordPart>> {
    map(take_while1(|c| !is_word_terminator(c)), |run: &str| {
        vec![WordPart::Literal(run.to_string())]
    })(input)
}

/// Parse a full word: one or more adjacent segments
fn word(input: &str) -> IResult<&str, Token> {
    map(
        many1(alt((
            double_quoted,
            single_quoted,
            variable,
            bare_segment,
            lone_dollar,
        ))),
        |segments| {
            Token::Word(Word {
                parts: segments.into_iter().flatten().collect(),
            })
        },
    )(input)
}

/// Parse any operator token. Longer spellings first so `&&` never
/// lexes as two `&` and `2>>` never lexes as `2>` `>`.
fn operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::And, tag("&&")),
        value(Token::Or, tag("||")),
        value(Token::RedirectBoth, tag("&>")),
        value(Token::RedirectErrAppend, tag("2>>")),
        value(Token::RedirectErr, tag("2>")),
        value(Token::RedirectAppend, tag(">>")),
        value(Token::RedirectOut, char('>')),
        value(Token::RedirectIn, char('<')),
        value(Token::Pipe, char('|')),
        value(Token::Background, char('&')),
        value(Token::Semi, char(';')),
    ))(input)
}

/// Parse any single token
fn token(input: &str) -> IResult<&str, Token> {
    preceded(multispace0, alt((operator, word)))(input)
}

/// Strip comments: `#` to end of line, when it begins a word and sits
/// outside quotes.
fn strip_comments(input: &str) -> String {
    let mut result = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut at_word_start = true;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                at_word_start = false;
                result.push(c);
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                at_word_start = false;
                result.push(c);
            }
            '#' if !in_single_quote && !in_double_quote && at_word_start => {
                for remaining in chars.by_ref() {
                    if remaining == '\n' {
                        result.push('\n');
                        at_word_start = true;
                        break;
                    }
                }
            }
            _ => {
                at_word_start = c.is_whitespace();
                result.push(c);
            }
        }
    }
    result
}

/// Tokenize a complete input string
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let input = strip_comments(input);

    let (remaining, tokens) =
        many0(token)(input.as_str()).map_err(|e| LexError::ParseError(format!("{:?}", e)))?;

    let remaining = remaining.trim();
    if !remaining.is_empty() {
        return Err(LexError::UnexpectedChar(
            remaining.chars().next().unwrap(),
        ));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Token {
        Token::Word(Word::literal(text))
    }

    #[test]
    fn tokenize_simple_command() {
        let tokens = lex("ls -la /tmp").unwrap();
        assert_eq!(tokens, vec![plain("ls"), plain("-la"), plain("/tmp")]);
    }

    #[test]
    fn tokenize_operators() {
        let tokens = lex("a ; b & c && d || e | f").unwrap();
        assert_eq!(
            tokens,
            vec![
                plain("a"),
                Token::Semi,
                plain("b"),
                Token::Background,
                plain("c"),
                Token::And,
                plain("d"),
                Token::Or,
                plain("e"),
                Token::Pipe,
                plain("f"),
            ]
        );
    }

    #[test]
    fn tokenize_redirects() {
        let tokens = lex("sort < in > out 2> err").unwrap();
        assert_eq!(
            tokens,
            vec![
                plain("sort"),
                Token::RedirectIn,
                plain("in"),
                Token::RedirectOut,
                plain("out"),
                Token::RedirectErr,
                plain("err"),
            ]
        );
    }

    #[test]
    fn tokenize_append_redirects() {
        let tokens = lex("cmd >> log 2>> log").unwrap();
        assert_eq!(
            tokens,
            vec![
                plain("cmd"),
                Token::RedirectAppend,
                plain("log"),
                Token::RedirectErrAppend,
                plain("log"),
            ]
        );
    }

    #[test]
    fn tokenize_redirect_both() {
        let tokens = lex("cmd &> all").unwrap();
        assert_eq!(
            tokens,
            vec![plain("cmd"), Token::RedirectBoth, plain("all")]
        );
    }

    #[test]
    fn operators_need_no_surrounding_space() {
        let tokens = lex("a&&b|c").unwrap();
        assert_eq!(
            tokens,
            vec![plain("a"), Token::And, plain("b"), Token::Pipe, plain("c")]
        );
    }

    #[test]
    fn digit_inside_word_is_not_an_err_redirect() {
        let tokens = lex("file2>out").unwrap();
        assert_eq!(
            tokens,
            vec![plain("file2"), Token::RedirectOut, plain("out")]
        );
    }

    #[test]
    fn tokenize_quoted_strings() {
        let tokens = lex("echo \"hello world\" 'single $HOME'").unwrap();
        assert_eq!(
            tokens,
            vec![plain("echo"), plain("hello world"), plain("single $HOME")]
        );
    }

    #[test]
    fn tokenize_variable() {
        let tokens = lex("echo $HOME ${USER}").unwrap();
        assert_eq!(
            tokens,
            vec![
                plain("echo"),
                Token::Word(Word {
                    parts: vec![WordPart::Variable("HOME".into())],
                }),
                Token::Word(Word {
                    parts: vec![WordPart::Variable("USER".into())],
                }),
            ]
        );
    }

    #[test]
    fn tokenize_mixed_word() {
        let tokens = lex("a$HOME/b").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Word(Word {
                parts: vec![
                    WordPart::Literal("a".into()),
                    WordPart::Variable("HOME".into()),
                    WordPart::Literal("/b".into()),
                ],
            })]
        );
    }

    #[test]
    fn variable_inside_double_quotes() {
        let tokens = lex("\"hi $USER!\"").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Word(Word {
                parts: vec![
                    WordPart::Literal("hi ".into()),
                    WordPart::Variable("USER".into()),
                    WordPart::Literal("!".into()),
                ],
            })]
        );
    }

    #[test]
    fn lone_dollar_is_literal() {
        let tokens = lex("echo $").unwrap();
        assert_eq!(tokens, vec![plain("echo"), plain("$")]);
    }

    #[test]
    fn tokenize_inline_comment() {
        let tokens = lex("echo hi # the rest vanishes").unwrap();
        assert_eq!(tokens, vec![plain("echo"), plain("hi")]);
    }

    #[test]
    fn hash_inside_word_is_kept() {
        let tokens = lex("echo file#1").unwrap();
        assert_eq!(tokens, vec![plain("echo"), plain("file#1")]);
    }

    #[test]
    fn comment_preserves_quotes() {
        let tokens = lex("echo '#not a comment' # but this is").unwrap();
        assert_eq!(tokens, vec![plain("echo"), plain("#not a comment")]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = lex("echo \"oops").unwrap_err();
        assert!(matches!(err, LexError::UnexpectedChar('"')));
    }

    #[test]
    fn empty_input_is_no_tokens() {
        assert_eq!(lex("   ").unwrap(), vec![]);
    }
}
