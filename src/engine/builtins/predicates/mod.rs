//! Type predicates and `not`. Operands are tested literally: a symbol is a symbol even
//! when it is bound.

use crate::engine::builtins::exact_operands;
use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

macro_rules! define_predicate_fn {
    ($fn_name:ident, $name:expr, $test:expr) => {
        #[tracing::instrument(skip(args, env), ret, err)]
        pub fn $fn_name(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
            trace!("Executing native '{}' predicate", $name);
            let [operand] = exact_operands::<1>($name, args, env)?;
            let test: fn(&Value) -> bool = $test;
            Ok(Value::Bool(test(&operand)))
        }
    };
}

define_predicate_fn!(native_is_number, "number?", |v| matches!(v, Value::Number(_)));
define_predicate_fn!(native_is_boolean, "boolean?", |v| matches!(v, Value::Bool(_)));
define_predicate_fn!(native_is_symbol, "symbol?", |v| matches!(v, Value::Symbol(_)));
// A pair is anything whose chain has exactly two links: `(1 2)` as well as `(1 . 2)`.
define_predicate_fn!(native_is_pair, "pair?", |v| v.chain_length() == 2);
define_predicate_fn!(native_is_null, "null?", Value::is_nil);
define_predicate_fn!(native_is_list, "list?", |v| v.chain_end().is_nil());
define_predicate_fn!(native_not, "not", |v| matches!(v, Value::Bool(false)));

#[cfg(test)]
mod tests {
    use crate::engine::eval::SchemeError;
    use crate::engine::interpreter::Interpreter;
    use crate::logging::init_test_logging;

    fn run(code: &str) -> Result<String, SchemeError> {
        init_test_logging();
        Interpreter::new().run(code)
    }

    fn yes(code: &str) {
        assert_eq!(run(code), Ok("#t".to_string()), "{code}");
    }

    fn no(code: &str) {
        assert_eq!(run(code), Ok("#f".to_string()), "{code}");
    }

    #[test]
    fn test_number_predicate() {
        yes("(number? 5)");
        yes("(number? (+ 1 2))");
        no("(number? #t)");
        no("(number? 'a)");
    }

    #[test]
    fn test_boolean_predicate() {
        yes("(boolean? #f)");
        yes("(boolean? (< 1 2))");
        no("(boolean? 0)");
    }

    #[test]
    fn test_symbol_predicate() {
        yes("(symbol? 'abc)");
        yes("(symbol? abc)");
        no("(symbol? 1)");
    }

    #[test]
    fn test_pair_predicate_uses_chain_length() {
        yes("(pair? '(1 2))");
        yes("(pair? '(1 . 2))");
        yes("(pair? (cons 1 2))");
        no("(pair? '(1 2 3))");
        no("(pair? 5)");
        no("(pair? '())");
    }

    #[test]
    fn test_null_predicate() {
        yes("(null? '())");
        yes("(null? ())");
        no("(null? '(1))");
        no("(null? 0)");
    }

    #[test]
    fn test_list_predicate() {
        yes("(list? '(1 2 3))");
        yes("(list? '())");
        no("(list? '(1 . 2))");
        no("(list? 7)");
    }

    #[test]
    fn test_not() {
        yes("(not #f)");
        no("(not #t)");
        no("(not 0)");
        no("(not '())");
    }

    #[test]
    fn test_predicates_check_arity() {
        assert!(matches!(run("(number? 1 2)"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(null?)"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(not #f #f)"), Err(SchemeError::Runtime(_))));
    }
}
