use crate::engine::env::Environment;
use crate::engine::value::{Procedure, Value};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, error, instrument, trace};

/// The three error categories of the evaluator. Callers tell them apart by variant,
/// the message is for humans.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Name error: {0}")]
    Name(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Evaluates `value` as a top-level form.
///
/// Symbols are looked up (unbound names are a [`SchemeError::Name`]), other atoms evaluate
/// to themselves and a pair is a call: its first slot is resolved to a procedure which is
/// then handed the *unevaluated* second slot.
#[instrument(skip(value, env), fields(value = ?value), ret, err)]
pub fn eval(value: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Starting evaluation");
    match value {
        Value::Nil | Value::Number(_) | Value::Bool(_) | Value::Procedure(_) => {
            debug!("Evaluating self-evaluating value: {:?}", value);
            Ok(value.clone())
        }
        Value::Symbol(name) => {
            debug!(symbol_name = %name, "Evaluating Symbol");
            env.borrow().get(name).ok_or_else(|| {
                error!(symbol_name = %name, "Undefined symbol encountered");
                SchemeError::Name(format!("unbound symbol '{}'", name))
            })
        }
        Value::Pair(cell) => {
            let (operator, operands) = {
                let pair = cell.borrow();
                (pair.first.clone(), pair.second.clone())
            };
            let procedure = resolve_operator(&operator, Rc::clone(&env))?;
            apply(&procedure, &operands, env)
        }
    }
}

/// Turns the operator position of a call form into a procedure.
fn resolve_operator(
    operator: &Value,
    env: Rc<RefCell<Environment>>,
) -> Result<Procedure, SchemeError> {
    let resolved = match operator {
        Value::Nil => {
            error!("Call form has an empty operator position");
            return Err(SchemeError::Runtime(
                "procedure applied to nothing".to_string(),
            ));
        }
        Value::Pair(_) => {
            trace!("Operator is a call form, evaluating it to get the procedure");
            eval(operator, env)?
        }
        Value::Symbol(name) => env
            .borrow()
            .get(name)
            .unwrap_or_else(|| operator.clone()),
        other => other.clone(),
    };
    match resolved {
        Value::Procedure(procedure) => Ok(procedure),
        other => {
            error!(operator = ?operator, resolved = ?other, "Attempted to call a non-procedure");
            Err(SchemeError::Runtime(format!(
                "not a procedure: {}",
                describe(operator)
            )))
        }
    }
}

/// Applies `procedure` to a raw argument chain.
#[instrument(skip(procedure, args, env), fields(procedure = %procedure.name()), ret, err)]
pub fn apply(
    procedure: &Procedure,
    args: &Value,
    env: Rc<RefCell<Environment>>,
) -> Result<Value, SchemeError> {
    match procedure {
        Procedure::Native(native) => {
            debug!(native_procedure_name = %native.name, "Applying NativeProcedure");
            (native.func)(args, env)
        }
        Procedure::Closure(closure) => {
            // Closure bodies are not evaluated: only the arguments are.
            let evaluated_args = flatten(args, env)?;
            debug!(
                params = ?closure.params,
                args = ?evaluated_args,
                "Applied closure, yielding empty"
            );
            Ok(Value::Nil)
        }
    }
}

/// Produces the operand sequence of a raw argument chain.
///
/// Atoms are taken literally. A nested pair whose head names a procedure is evaluated and
/// its result appended; any other nested pair is flattened in turn and its elements are
/// spliced into the outer sequence.
#[instrument(level = "trace", skip(args, env), fields(args = ?args), ret, err)]
pub fn flatten(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Vec<Value>, SchemeError> {
    let mut operands = Vec::new();
    flatten_into(args, &env, &mut operands)?;
    Ok(operands)
}

fn flatten_into(
    args: &Value,
    env: &Rc<RefCell<Environment>>,
    operands: &mut Vec<Value>,
) -> Result<(), SchemeError> {
    let mut cursor = args.clone();
    loop {
        let (element, rest) = match &cursor {
            Value::Nil => return Ok(()),
            Value::Pair(cell) => {
                let pair = cell.borrow();
                (pair.first.clone(), pair.second.clone())
            }
            tail => {
                trace!(?tail, "Appending dotted tail");
                operands.push(tail.clone());
                return Ok(());
            }
        };

        match &element {
            Value::Pair(inner) => {
                let head = inner.borrow().first.clone();
                if names_procedure(&head, env) {
                    trace!(?head, "Nested call form, evaluating");
                    operands.push(eval(&element, Rc::clone(env))?);
                } else {
                    trace!(?head, "Nested list without procedure head, splicing");
                    flatten_into(&element, env, operands)?;
                }
            }
            _ => operands.push(element),
        }
        cursor = rest;
    }
}

fn names_procedure(head: &Value, env: &Rc<RefCell<Environment>>) -> bool {
    match head {
        Value::Symbol(name) => matches!(env.borrow().get(name), Some(Value::Procedure(_))),
        Value::Procedure(_) => true,
        _ => false,
    }
}

/// Short description of a value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Symbol(name) => format!("symbol '{}'", name),
        Value::Number(n) => format!("number {}", n),
        Value::Bool(b) => format!("boolean {}", if *b { "#t" } else { "#f" }),
        other => other.type_name().to_string(),
    }
}
