use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{instrument, trace};

/// Returns the operand chain untouched. Bound as both `quote` and `list`.
#[instrument(skip(args, _env), fields(args = ?args), ret, err)]
pub fn eval_quote(args: &Value, _env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'quote' special form");
    Ok(args.clone())
}

#[cfg(test)]
mod tests {
    use crate::engine::eval::SchemeError;
    use crate::engine::interpreter::Interpreter;
    use crate::logging::init_test_logging;

    fn run(code: &str) -> Result<String, SchemeError> {
        init_test_logging();
        Interpreter::new().run(code)
    }

    #[test]
    fn eval_quote_symbol() {
        assert_eq!(run("(quote x)"), Ok("x".to_string()));
        assert_eq!(run("'x"), Ok("x".to_string()));
    }

    #[test]
    fn eval_quote_number() {
        assert_eq!(run("(quote 10)"), Ok("10".to_string()));
    }

    #[test]
    fn eval_quote_list() {
        assert_eq!(run("(quote (1 2))"), Ok("(1 2)".to_string()));
        assert_eq!(run("'(a (b c) . d)"), Ok("(a (b c) . d)".to_string()));
    }

    #[test]
    fn eval_quote_empty_list() {
        assert_eq!(run("(quote ())"), Ok("()".to_string()));
    }

    #[test]
    fn eval_quote_does_not_evaluate() {
        assert_eq!(run("'(+ 1 2)"), Ok("(+ 1 2)".to_string()));
        assert_eq!(run("'(undefined-thing 1)"), Ok("(undefined-thing 1)".to_string()));
    }

    #[test]
    fn eval_quote_is_idempotent() {
        init_test_logging();
        let mut interpreter = Interpreter::new();
        for _ in 0..3 {
            assert_eq!(
                interpreter.run("(quote (1 (2 #t) . #f))"),
                Ok("(1 (2 #t) . #f)".to_string())
            );
        }
    }

    #[test]
    fn quoted_bound_symbol_prints_its_value() {
        init_test_logging();
        let mut interpreter = Interpreter::new();
        interpreter.run("(define x 5)").unwrap();
        assert_eq!(interpreter.run("'x"), Ok("5".to_string()));
        assert_eq!(interpreter.run("'(x)"), Ok("(x)".to_string()));
    }
}
