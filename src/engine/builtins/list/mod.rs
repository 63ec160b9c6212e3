use crate::engine::builtins::{
    arity_error, exact_operands, expect_number, resolve_operand, type_error,
};
use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, flatten};
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, trace};

// Splits a non-empty pair operand into its slots.
fn expect_pair(
    name: &str,
    operand: &Value,
    env: &Rc<RefCell<Environment>>,
) -> Result<(Value, Value), SchemeError> {
    match resolve_operand(operand, env) {
        Value::Nil => {
            let empty_error = SchemeError::Runtime(format!("'{}' of an empty list", name));
            error!(error = %empty_error, "Empty list access in native '{}'", name);
            Err(empty_error)
        }
        resolved => resolved
            .split()
            .ok_or_else(|| type_error(name, "a pair", operand)),
    }
}

fn expect_index(
    name: &str,
    operand: &Value,
    env: &Rc<RefCell<Environment>>,
) -> Result<usize, SchemeError> {
    let index = expect_number(name, operand, env)?;
    usize::try_from(index).map_err(|_| {
        let index_error = SchemeError::Runtime(format!("'{}' index {} is negative", name, index));
        error!(error = %index_error, "Negative index in native '{}'", name);
        index_error
    })
}

fn out_of_range(name: &str, index: usize) -> SchemeError {
    let range_error = SchemeError::Runtime(format!("'{}' index {} is out of range", name, index));
    error!(error = %range_error, "Index out of range in native '{}'", name);
    range_error
}

// Follows `steps` second-slot links from the front of `list`.
fn walk(name: &str, list: Value, steps: usize) -> Result<Value, SchemeError> {
    let mut cursor = list;
    for _ in 0..steps {
        cursor = match cursor.split() {
            Some((_, rest)) => rest,
            None => return Err(out_of_range(name, steps)),
        };
    }
    Ok(cursor)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_car(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'car' function");
    let [operand] = exact_operands::<1>("car", args, Rc::clone(&env))?;
    let (first, _) = expect_pair("car", &operand, &env)?;
    Ok(first)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_cdr(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'cdr' function");
    let [operand] = exact_operands::<1>("cdr", args, Rc::clone(&env))?;
    let (_, second) = expect_pair("cdr", &operand, &env)?;
    Ok(second)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_cons(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'cons' function");
    let [first, second] = exact_operands::<2>("cons", args, env)?;
    Ok(Value::cons(first, second))
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_list_ref(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'list-ref' function");
    let [list, index] = exact_operands::<2>("list-ref", args, Rc::clone(&env))?;
    let index = expect_index("list-ref", &index, &env)?;
    let list = resolve_operand(&list, &env);
    match walk("list-ref", list, index)?.split() {
        Some((element, _)) => Ok(element),
        None => Err(out_of_range("list-ref", index)),
    }
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_list_tail(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'list-tail' function");
    let [list, index] = exact_operands::<2>("list-tail", args, Rc::clone(&env))?;
    let index = expect_index("list-tail", &index, &env)?;
    let list = resolve_operand(&list, &env);
    walk("list-tail", list, index)
}

/// `(set-car! name value)`: replaces, in place, the first slot of the pair bound to `name`.
///
/// The target is taken as written and must be a symbol; the remaining operands are
/// flattened and must yield exactly one value.
#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_set_car(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'set-car!' function");
    let (target, rest) = args
        .split()
        .ok_or_else(|| arity_error("set-car!", "exactly 2 arguments", 0))?;
    let name = match &target {
        Value::Symbol(name) => name.clone(),
        other => return Err(type_error("set-car!", "a symbol naming a pair", other)),
    };

    let values = flatten(&rest, Rc::clone(&env))?;
    let value = match <[Value; 1]>::try_from(values) {
        Ok([value]) => value,
        Err(values) => return Err(arity_error("set-car!", "exactly 2 arguments", values.len() + 1)),
    };

    let bound = env.borrow().get(&name).ok_or_else(|| {
        let unbound_error = SchemeError::Runtime(format!("'set-car!' target '{}' is unbound", name));
        error!(error = %unbound_error, "Unbound target in native 'set-car!'");
        unbound_error
    })?;
    match &bound {
        Value::Pair(cell) if bound.chain_length() == 2 => {
            debug!(target = %name, ?value, "Replacing first slot in place");
            cell.borrow_mut().first = value;
            Ok(Value::Nil)
        }
        _ => Err(type_error("set-car!", "a symbol naming a pair", &bound)),
    }
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
    fn test_car_and_cdr() {
        assert_eq!(run("(car (quote (1 2 3)))"), Ok("1".to_string()));
        assert_eq!(run("(cdr (quote (1 2 3)))"), Ok("(2 3)".to_string()));
        assert_eq!(run("(cdr '(1 . 2))"), Ok("2".to_string()));
        assert_eq!(run("(cdr '(1))"), Ok("()".to_string()));
        assert_eq!(run("(car '((1 2) 3))"), Ok("(1 2)".to_string()));
    }

    #[test]
    fn test_car_errors() {
        assert!(matches!(run("(car 5)"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(car '())"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(cdr '())"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(car)"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn test_cons() {
        assert_eq!(run("(cons 1 2)"), Ok("(1 . 2)".to_string()));
        assert_eq!(run("(cons 1 '(2 3))"), Ok("(1 2 3)".to_string()));
        assert_eq!(run("(cons '() 1)"), Ok("(() . 1)".to_string()));
        assert!(matches!(run("(cons 1)"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn test_list_ref() {
        assert_eq!(run("(list-ref '(10 20 30) 0)"), Ok("10".to_string()));
        assert_eq!(run("(list-ref '(10 20 30) 2)"), Ok("30".to_string()));
        assert!(matches!(run("(list-ref '(10 20 30) 3)"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(list-ref '(10 20) -1)"), Err(SchemeError::Runtime(_))));
        assert!(matches!(run("(list-ref '(10 20) #t)"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn test_list_tail() {
        assert_eq!(run("(list-tail '(1 2 3) 1)"), Ok("(2 3)".to_string()));
        assert_eq!(run("(list-tail '(1 2 3) 0)"), Ok("(1 2 3)".to_string()));
        assert_eq!(run("(list-tail '(1 2 3) 3)"), Ok("()".to_string()));
        assert!(matches!(run("(list-tail '(1 2 3) 4)"), Err(SchemeError::Runtime(_))));
    }

    #[test]
    fn test_list_does_not_evaluate_arguments() {
        assert_eq!(run("(list 1 2 3)"), Ok("(1 2 3)".to_string()));
        assert_eq!(run("(list (+ 1 2) 4)"), Ok("((+ 1 2) 4)".to_string()));
        assert_eq!(run("(list)"), Ok("()".to_string()));
    }

    #[test]
    fn test_set_car_mutates_bound_pair() {
        init_test_logging();
        let mut interpreter = Interpreter::new();
        interpreter.run("(define p (cons 1 2))").unwrap();
        assert_eq!(interpreter.run("(set-car! p 9)"), Ok("()".to_string()));
        assert_eq!(interpreter.run("(car p)"), Ok("9".to_string()));
        assert_eq!(interpreter.run("(cdr p)"), Ok("2".to_string()));
        assert_eq!(interpreter.run("p"), Ok("(9 . 2)".to_string()));
    }

    #[test]
    fn test_set_car_evaluates_new_value() {
        init_test_logging();
        let mut interpreter = Interpreter::new();
        interpreter.run("(define p (list 1 2))").unwrap();
        interpreter.run("(set-car! p (* 6 7))").unwrap();
        assert_eq!(interpreter.run("p"), Ok("(42 2)".to_string()));
    }

    #[test]
    fn test_set_car_errors() {
        init_test_logging();
        let mut interpreter = Interpreter::new();
        interpreter.run("(define n 1)").unwrap();
        interpreter.run("(define long (list 1 2 3))").unwrap();
        for code in [
            "(set-car! missing 1)",
            "(set-car! n 1)",
            "(set-car! long 1)",
            "(set-car! 5 1)",
            "(set-car! n)",
            "(set-car!)",
        ] {
            assert!(
                matches!(interpreter.run(code), Err(SchemeError::Runtime(_))),
                "{code} should be a runtime error"
            );
        }
    }
}
