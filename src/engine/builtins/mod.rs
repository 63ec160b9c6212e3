//! Builtin procedures and special forms, and the operand helpers they share.

pub mod globals;
pub mod list;
pub mod math;
pub mod predicates;
pub mod special_forms;

use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, describe, flatten};
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::error;

pub(crate) fn arity_error(name: &str, expected: &str, got: usize) -> SchemeError {
    let arity_error = SchemeError::Runtime(format!(
        "'{}' expects {}, got {}",
        name, expected, got
    ));
    error!(error = %arity_error, "Arity error in native '{}'", name);
    arity_error
}

pub(crate) fn type_error(name: &str, expected: &str, found: &Value) -> SchemeError {
    let type_error = SchemeError::Runtime(format!(
        "'{}' expects {}, found {}",
        name,
        expected,
        describe(found)
    ));
    error!(operator = %name, error = %type_error, "Type error in native function");
    type_error
}

/// Flattens `args` and checks that exactly `N` operands came out.
pub(crate) fn exact_operands<const N: usize>(
    name: &str,
    args: &Value,
    env: Rc<RefCell<Environment>>,
) -> Result<[Value; N], SchemeError> {
    let operands = flatten(args, env)?;
    let got = operands.len();
    operands.try_into().map_err(|_| {
        let expected = if N == 1 {
            "exactly 1 argument".to_string()
        } else {
            format!("exactly {} arguments", N)
        };
        arity_error(name, &expected, got)
    })
}

/// A symbol operand bound in `env` stands for its bound value; anything else is itself.
pub(crate) fn resolve_operand(operand: &Value, env: &Rc<RefCell<Environment>>) -> Value {
    match operand {
        Value::Symbol(name) => env.borrow().get(name).unwrap_or_else(|| operand.clone()),
        other => other.clone(),
    }
}

pub(crate) fn expect_number(
    name: &str,
    operand: &Value,
    env: &Rc<RefCell<Environment>>,
) -> Result<i64, SchemeError> {
    match resolve_operand(operand, env) {
        Value::Number(n) => Ok(n),
        _ => Err(type_error(name, "a number", operand)),
    }
}

/// Flattens `args` and coerces every operand to a number.
pub(crate) fn numeric_operands(
    name: &str,
    args: &Value,
    env: Rc<RefCell<Environment>>,
) -> Result<Vec<i64>, SchemeError> {
    let operands = flatten(args, Rc::clone(&env))?;
    operands
        .iter()
        .map(|operand| expect_number(name, operand, &env))
        .collect()
}
