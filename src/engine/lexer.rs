use nom::{
    IResult,
    Parser, // For .map() and .parse() on parsers
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{not, recognize, value},
    error::{Error, ErrorKind},
    sequence::{pair, terminated},
};
use tracing::{error, trace};

use crate::engine::eval::SchemeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Open,
    Close,
    Dot,
    Quote,
    Symbol(String),
    Constant(i64),
}

fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || "<=>*/#".contains(c)
}

fn is_symbol_continue(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit() || "?!-".contains(c)
}

// Everything C's `isspace` accepts, vertical tab included.
fn skip_whitespace(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_whitespace() || c == '\x0b').parse(input)
}

// Digits that do not fit an i64 are a hard failure, so `alt` reports the constant instead
// of falling through to the other token kinds.
fn constant<'a>(input: &'a str, rest: &'a str, text: &str) -> IResult<&'a str, Token> {
    match text.parse::<i64>() {
        Ok(n) => Ok((rest, Token::Constant(n))),
        Err(_) => Err(nom::Err::Failure(Error::new(input, ErrorKind::MapRes))),
    }
}

// `+12` or `-7`.
fn signed_constant(input: &str) -> IResult<&str, Token> {
    let scanned: IResult<&str, &str> = recognize(pair(one_of("+-"), digit1)).parse(input);
    let (rest, text) = scanned?;
    constant(input, rest, text)
}

// A lone `+` or `-` is a symbol as long as no digit follows it.
fn sign_symbol(input: &str) -> IResult<&str, Token> {
    terminated(one_of("+-"), not(satisfy(|c: char| c.is_ascii_digit())))
        .map(|sign: char| Token::Symbol(sign.to_string()))
        .parse(input)
}

fn unsigned_constant(input: &str) -> IResult<&str, Token> {
    let scanned: IResult<&str, &str> = digit1(input);
    let (rest, text) = scanned?;
    constant(input, rest, text)
}

fn symbol(input: &str) -> IResult<&str, Token> {
    recognize(pair(satisfy(is_symbol_start), take_while(is_symbol_continue)))
        .map(|name: &str| Token::Symbol(name.to_string()))
        .parse(input)
}

#[tracing::instrument(level = "trace", skip(input), fields(input = %input))]
fn token(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
        value(Token::Dot, char('.')),
        value(Token::Quote, char('\'')),
        signed_constant,
        sign_symbol,
        unsigned_constant,
        symbol,
    ))
    .parse(input)
}

/// Pull-based tokenizer: holds the current token and advances on request.
/// `current()` is `None` once the input is exhausted.
#[derive(Debug)]
pub struct Lexer<'a> {
    rest: &'a str,
    current: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned on the first token of `source`.
    pub fn new(source: &'a str) -> Result<Self, SchemeError> {
        let mut lexer = Lexer {
            rest: source,
            current: None,
        };
        lexer.advance()?;
        Ok(lexer)
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the next token, or to the end state when only whitespace remains.
    pub fn advance(&mut self) -> Result<(), SchemeError> {
        let (rest, _) = skip_whitespace(self.rest)
            .map_err(|e| SchemeError::Syntax(format!("unreadable input: {}", e)))?;
        if rest.is_empty() {
            trace!("Reached end of input");
            self.rest = rest;
            self.current = None;
            return Ok(());
        }
        match token(rest) {
            Ok((remaining, token)) => {
                trace!(?token, "Scanned token");
                self.rest = remaining;
                self.current = Some(token);
                Ok(())
            }
            Err(nom::Err::Failure(Error {
                input,
                code: ErrorKind::MapRes,
            })) => {
                let literal_len = input
                    .char_indices()
                    .skip(1)
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map_or(input.len(), |(at, _)| at);
                let literal = &input[..literal_len];
                error!(literal = %literal, "Integer constant out of range");
                Err(SchemeError::Syntax(format!(
                    "integer constant {} does not fit in 64 bits",
                    literal
                )))
            }
            Err(_) => {
                let offending = rest.chars().next().unwrap_or_default();
                error!(character = ?offending, "Unexpected character in input");
                Err(SchemeError::Syntax(format!(
                    "unexpected character {:?}",
                    offending
                )))
            }
        }
    }
}
