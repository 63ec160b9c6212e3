use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, eval as main_eval};
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{instrument, trace};

// Call forms are evaluated, any other operand is taken as written.
fn operand_value(operand: &Value, env: &Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    match operand {
        Value::Pair(_) => main_eval(operand, Rc::clone(env)),
        literal => Ok(literal.clone()),
    }
}

/// `(and ...)`: `#f` at the first false operand, otherwise the last value. `(and)` is `#t`.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_and(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'and' special form");
    let mut last = Value::Bool(true);
    for operand in args.chain_items() {
        last = operand_value(&operand, &env)?;
        if !last.is_truthy() {
            trace!("Short-circuiting 'and' on a false operand");
            return Ok(Value::Bool(false));
        }
    }
    Ok(last)
}

/// `(or ...)`: `#t` at the first true operand, otherwise the last value. `(or)` is `#f`.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_or(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'or' special form");
    let mut last = Value::Bool(false);
    for operand in args.chain_items() {
        last = operand_value(&operand, &env)?;
        if last.is_truthy() {
            trace!("Short-circuiting 'or' on a true operand");
            return Ok(Value::Bool(true));
        }
    }
    Ok(last)
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
    fn empty_and_or() {
        assert_eq!(run("(and)"), Ok("#t".to_string()));
        assert_eq!(run("(or)"), Ok("#f".to_string()));
    }

    #[test]
    fn and_returns_last_value_when_all_true() {
        assert_eq!(run("(and 1 2)"), Ok("2".to_string()));
        assert_eq!(run("(and #t (+ 1 2))"), Ok("3".to_string()));
    }

    #[test]
    fn and_stops_at_first_false() {
        assert_eq!(run("(and #t #f 3)"), Ok("#f".to_string()));
        // The failing call after the false operand is never evaluated.
        assert_eq!(run("(and #f (car 5))"), Ok("#f".to_string()));
    }

    #[test]
    fn or_stops_at_first_true() {
        assert_eq!(run("(or #f 7)"), Ok("#t".to_string()));
        assert_eq!(run("(or 1 (car 5))"), Ok("#t".to_string()));
    }

    #[test]
    fn or_all_false() {
        assert_eq!(run("(or #f #f)"), Ok("#f".to_string()));
        assert_eq!(run("(or #f (< 2 1))"), Ok("#f".to_string()));
    }

    #[test]
    fn operand_errors_propagate() {
        assert!(matches!(run("(and #t (car 5))"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(or #f (/ 1 0))"), Err(SchemeError::Runtime(_))));
    }
}
