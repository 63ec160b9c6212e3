//! Recursive-descent reader from tokens to S-expression values.

use tracing::{error, instrument, trace};

use crate::engine::eval::SchemeError;
use crate::engine::lexer::{Lexer, Token};
use crate::engine::special_forms::QUOTE;
use crate::engine::value::Value;

fn unexpected(what: &str) -> SchemeError {
    error!("Syntax error: {}", what);
    SchemeError::Syntax(what.to_string())
}

fn expect_close(lexer: &mut Lexer) -> Result<(), SchemeError> {
    match lexer.current() {
        Some(Token::Close) => lexer.advance(),
        Some(other) => Err(unexpected(&format!("expected ')', found {:?}", other))),
        None => Err(unexpected("expected ')', found end of input")),
    }
}

fn quoted(operand: Value) -> Value {
    Value::cons(Value::symbol(QUOTE), operand)
}

/// Reads exactly one expression starting at the lexer's current token and leaves the
/// lexer on the token after it.
///
/// Both `'x` and `(quote x)` read as the pair `(quote . x)`. An empty list reads as
/// [`Value::Nil`].
#[instrument(level = "trace", skip(lexer), ret, err)]
pub fn read(lexer: &mut Lexer) -> Result<Value, SchemeError> {
    let token = match lexer.current() {
        None => return Err(unexpected("unexpected end of input")),
        Some(token) => token.clone(),
    };
    trace!(?token, "Reading expression");
    match token {
        Token::Close => Err(unexpected("unexpected ')'")),
        Token::Dot => Err(unexpected("unexpected '.'")),
        Token::Open => {
            lexer.advance()?;
            if lexer.current() == Some(&Token::Symbol(QUOTE.to_string())) {
                lexer.advance()?;
                let operand = read(lexer)?;
                expect_close(lexer)?;
                return Ok(quoted(operand));
            }
            read_list(lexer)
        }
        Token::Quote => {
            lexer.advance()?;
            let operand = read(lexer)?;
            Ok(quoted(operand))
        }
        Token::Symbol(name) => {
            lexer.advance()?;
            Ok(match name.as_str() {
                "#t" => Value::Bool(true),
                "#f" => Value::Bool(false),
                _ => Value::Symbol(name),
            })
        }
        Token::Constant(n) => {
            lexer.advance()?;
            Ok(Value::Number(n))
        }
    }
}

// Reads the remainder of a list whose '(' has already been consumed. Elements are read
// in a loop; only nesting recurses.
fn read_list(lexer: &mut Lexer) -> Result<Value, SchemeError> {
    let mut items = Vec::new();
    let tail = loop {
        match lexer.current() {
            None => return Err(unexpected("unterminated list")),
            Some(Token::Close) => {
                lexer.advance()?;
                break Value::Nil;
            }
            Some(Token::Dot) if items.is_empty() => {
                return Err(unexpected("'.' must follow a list element"));
            }
            Some(Token::Dot) => {
                lexer.advance()?;
                let tail = read(lexer)?;
                expect_close(lexer)?;
                break tail;
            }
            Some(_) => items.push(read(lexer)?),
        }
    };
    trace!(elements = items.len(), "Read list");
    Ok(items
        .into_iter()
        .rev()
        .fold(tail, |rest, item| Value::cons(item, rest)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    // Reads one expression and reports whether input remains after it.
    fn parse_expr(source: &str) -> Result<(Value, bool), SchemeError> {
        let mut lexer = Lexer::new(source)?;
        let value = read(&mut lexer)?;
        Ok((value, !lexer.is_end()))
    }

    fn parse_one(source: &str) -> Result<Value, SchemeError> {
        init_test_logging();
        let (value, trailing) = parse_expr(source)?;
        assert!(!trailing, "unexpected trailing input in {source:?}");
        Ok(value)
    }

    fn numbers(values: &[i64]) -> Value {
        Value::list(values.iter().map(|n| Value::Number(*n)))
    }

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse_one("123"), Ok(Value::Number(123)));
        assert_eq!(parse_one("  -45  "), Ok(Value::Number(-45)));
        assert_eq!(parse_one("abc"), Ok(Value::symbol("abc")));
        assert_eq!(parse_one("#t"), Ok(Value::Bool(true)));
        assert_eq!(parse_one("#f"), Ok(Value::Bool(false)));
        assert_eq!(parse_one("+"), Ok(Value::symbol("+")));
    }

    #[test]
    fn test_parse_proper_list() {
        assert_eq!(parse_one("(1 2 3)"), Ok(numbers(&[1, 2, 3])));
    }

    #[test]
    fn test_parse_empty_list_is_nil() {
        assert_eq!(parse_one("()"), Ok(Value::Nil));
        assert_eq!(parse_one("( )"), Ok(Value::Nil));
    }

    #[test]
    fn test_parse_dotted_pair() {
        assert_eq!(
            parse_one("(1 . 2)"),
            Ok(Value::cons(Value::Number(1), Value::Number(2)))
        );
        assert_eq!(
            parse_one("(1 2 . 3)"),
            Ok(Value::cons(
                Value::Number(1),
                Value::cons(Value::Number(2), Value::Number(3))
            ))
        );
    }

    #[test]
    fn test_parse_long_flat_list() {
        let source = format!("({} . 7)", vec!["1"; 100_000].join(" "));
        let value = parse_one(&source).unwrap();
        assert_eq!(value.chain_length(), 100_001);
        assert_eq!(value.chain_end(), Value::Number(7));
    }

    #[test]
    fn test_parse_nested_list() {
        assert_eq!(
            parse_one("((1 2) 3)"),
            Ok(Value::list([numbers(&[1, 2]), Value::Number(3)]))
        );
    }

    #[test]
    fn test_quote_forms_read_alike() {
        let expected = Value::cons(Value::symbol("quote"), numbers(&[1, 2]));
        assert_eq!(parse_one("'(1 2)"), Ok(expected.clone()));
        assert_eq!(parse_one("(quote (1 2))"), Ok(expected));
        assert_eq!(
            parse_one("'x"),
            Ok(Value::cons(Value::symbol("quote"), Value::symbol("x")))
        );
    }

    #[test]
    fn test_reports_trailing_input() {
        init_test_logging();
        assert_eq!(parse_expr("1 2"), Ok((Value::Number(1), true)));
        assert_eq!(parse_expr("(a) "), Ok((Value::list([Value::symbol("a")]), false)));
    }

    #[test]
    fn test_syntax_errors() {
        init_test_logging();
        for source in ["(", ")", ".", "(1 2", "(. 1)", "(1 . 2 3)", "(1 .)", "'", "(quote)", "(quote 1 2)"] {
            assert!(
                matches!(parse_expr(source), Err(SchemeError::Syntax(_))),
                "{source:?} should be a syntax error"
            );
        }
    }
}
