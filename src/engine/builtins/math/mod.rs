use crate::engine::builtins::{arity_error, exact_operands, expect_number, numeric_operands};
use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, trace};

fn overflow(op_name: &str) -> SchemeError {
    let overflow_error = SchemeError::Runtime(format!("integer overflow in '{}'", op_name));
    error!(error = %overflow_error, "Overflow in native '{}'", op_name);
    overflow_error
}

// Left fold over the operands starting from the first one.
fn fold_from_first(
    op_name: &str,
    numbers: &[i64],
    step: impl Fn(i64, i64) -> Result<i64, SchemeError>,
) -> Result<Value, SchemeError> {
    let (first, rest) = numbers
        .split_first()
        .ok_or_else(|| arity_error(op_name, "at least 1 argument", 0))?;
    rest.iter()
        .try_fold(*first, |acc, n| step(acc, *n))
        .map(Value::Number)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_add(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native '+' function");
    numeric_operands("+", args, env)?
        .into_iter()
        .try_fold(0i64, |sum, n| sum.checked_add(n).ok_or_else(|| overflow("+")))
        .map(Value::Number)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_multiply(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native '*' function");
    numeric_operands("*", args, env)?
        .into_iter()
        .try_fold(1i64, |product, n| {
            product.checked_mul(n).ok_or_else(|| overflow("*"))
        })
        .map(Value::Number)
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_subtract(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native '-' function");
    let numbers = numeric_operands("-", args, env)?;
    fold_from_first("-", &numbers, |acc, n| {
        acc.checked_sub(n).ok_or_else(|| overflow("-"))
    })
}

/// Integer division, truncating toward zero.
#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_divide(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native '/' function");
    let numbers = numeric_operands("/", args, env)?;
    fold_from_first("/", &numbers, |acc, divisor| {
        if divisor == 0 {
            let div_zero_error = SchemeError::Runtime("division by zero in '/'".to_string());
            error!(error = %div_zero_error, "Division by zero error in native '/'");
            return Err(div_zero_error);
        }
        acc.checked_div(divisor).ok_or_else(|| overflow("/"))
    })
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_max(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'max' function");
    let numbers = numeric_operands("max", args, env)?;
    fold_from_first("max", &numbers, |acc, n| Ok(acc.max(n)))
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_min(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'min' function");
    let numbers = numeric_operands("min", args, env)?;
    fold_from_first("min", &numbers, |acc, n| Ok(acc.min(n)))
}

#[tracing::instrument(skip(args, env), ret, err)]
pub fn native_abs(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing native 'abs' function");
    let [operand] = exact_operands::<1>("abs", args, Rc::clone(&env))?;
    let n = expect_number("abs", &operand, &env)?;
    n.checked_abs()
        .map(Value::Number)
        .ok_or_else(|| overflow("abs"))
}

// Helper macro to generate chained comparison functions: every adjacent pair of operands
// must satisfy the relation. Zero or one operand compares true.
macro_rules! define_comparison_fn {
    ($fn_name:ident, $op_str:expr, $op:tt) => {
        #[tracing::instrument(skip(args, env), ret, err)]
        pub fn $fn_name(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
            trace!("Executing native '{}' function", $op_str);
            let numbers = numeric_operands($op_str, args, env)?;
            let holds = numbers.windows(2).all(|adjacent| adjacent[0] $op adjacent[1]);
            Ok(Value::Bool(holds))
        }
    };
}

define_comparison_fn!(native_equals, "=", ==);
define_comparison_fn!(native_less_than, "<", <);
define_comparison_fn!(native_greater_than, ">", >);
define_comparison_fn!(native_less_than_or_equal, "<=", <=);
define_comparison_fn!(native_greater_than_or_equal, ">=", >=);
