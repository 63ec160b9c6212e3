use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, eval};
use crate::engine::lexer::Lexer;
use crate::engine::parser::read;
use crate::engine::printer::display;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, instrument};

/// Evaluates one expression per call against a binding table that persists for the
/// lifetime of the interpreter.
pub struct Interpreter {
    env: Rc<RefCell<Environment>>,
}

impl Interpreter {
    /// Creates an interpreter whose bindings hold exactly the builtins.
    pub fn new() -> Self {
        info!("Creating interpreter");
        Interpreter {
            env: Environment::new_with_prelude(),
        }
    }

    /// Reads exactly one expression from `source`, evaluates it and returns its printed form.
    #[instrument(skip(self), ret, err)]
    pub fn run(&mut self, source: &str) -> Result<String, SchemeError> {
        let mut lexer = Lexer::new(source)?;
        if lexer.is_end() {
            error!("No expression to evaluate");
            return Err(SchemeError::Runtime("no expression to evaluate".to_string()));
        }

        let expr = read(&mut lexer)?;
        if let Some(extra) = lexer.current() {
            error!(token = ?extra, "Input continues after the expression");
            return Err(SchemeError::Syntax(format!(
                "unexpected {:?} after the expression",
                extra
            )));
        }
        if expr.is_nil() {
            error!("Evaluated an empty list");
            return Err(SchemeError::Runtime(
                "cannot evaluate an empty list".to_string(),
            ));
        }
        debug!(?expr, "Parsed expression");

        let result = eval(&expr, Rc::clone(&self.env))?;
        display(&result, &self.env.borrow())
    }

    /// The value currently bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.borrow().get(name)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn session() -> Interpreter {
        init_test_logging();
        Interpreter::new()
    }

    fn run(code: &str) -> Result<String, SchemeError> {
        session().run(code)
    }

    #[test]
    fn numbers_print_as_written() {
        for n in ["0", "42", "-7", "9223372036854775807", "-9223372036854775808"] {
            assert_eq!(run(n), Ok(n.to_string()));
        }
        assert_eq!(run("+5"), Ok("5".to_string()));
    }

    #[test]
    fn booleans_and_empty_quote() {
        assert_eq!(run("#t"), Ok("#t".to_string()));
        assert_eq!(run("#f"), Ok("#f".to_string()));
        assert_eq!(run("'()"), Ok("()".to_string()));
    }

    #[test]
    fn empty_input_is_runtime_error() {
        assert!(matches!(run(""), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("   \n\t"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("()"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn trailing_input_is_syntax_error() {
        assert!(matches!(run("1 2"), Err(SchemeError::Syntax(_))));
        assert!(matches!(run("(+ 1 2))"), Err(SchemeError::Syntax(_))));
        assert!(matches!(run("(+ 1 2) x"), Err(SchemeError::Syntax(_))));
    }

    #[test]
    fn malformed_input_is_syntax_error() {
        for code in ["(", ")", "(1 . )", "(. 1)", "(1 . 2 3)", "'", "(quote 1 2)"] {
            assert!(
                matches!(run(code), Err(SchemeError::Syntax(_))),
                "{code} should be a syntax error"
            );
        }
    }

    #[test]
    fn unbound_symbol_is_name_error() {
        assert!(matches!(run("y"), Err(SchemeError::Name(_))));
    }

    #[test]
    fn builtin_name_alone_cannot_be_printed() {
        assert!(matches!(run("car"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn quote_is_idempotent() {
        let mut interpreter = session();
        for _ in 0..3 {
            assert_eq!(interpreter.run("(quote (a b . c))"), Ok("(a b . c)".to_string()));
            assert_eq!(interpreter.run("'sym"), Ok("sym".to_string()));
        }
    }

    #[test]
    fn bindings_persist_across_runs() {
        let mut interpreter = session();
        interpreter.run("(define x 5)").unwrap();
        assert_eq!(interpreter.lookup("x"), Some(Value::Number(5)));
        assert_eq!(interpreter.run("(+ x x)"), Ok("10".to_string()));
        // A fresh interpreter starts from the builtins alone.
        assert_eq!(Interpreter::new().lookup("x"), None);
    }

    #[test]
    fn set_car_is_visible_through_binding() {
        let mut interpreter = session();
        interpreter.run("(define p (cons 1 2))").unwrap();
        interpreter.run("(set-car! p 9)").unwrap();
        assert_eq!(interpreter.run("(car p)"), Ok("9".to_string()));
    }

    #[test]
    fn long_flat_call_evaluates() {
        let source = format!("(+ {})", vec!["1"; 100_000].join(" "));
        assert_eq!(run(&source), Ok("100000".to_string()));
        let quoted = format!("(list-tail '({}) 99999)", vec!["5"; 100_000].join(" "));
        assert_eq!(run(&quoted), Ok("(5)".to_string()));
    }

    #[test]
    fn failed_run_leaves_bindings_intact() {
        let mut interpreter = session();
        interpreter.run("(define x 1)").unwrap();
        assert!(interpreter.run("(car 5)").is_err());
        assert_eq!(interpreter.run("x"), Ok("1".to_string()));
    }
}
