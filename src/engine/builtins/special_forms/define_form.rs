use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, apply};
use crate::engine::special_forms::{DEFINE, SET};
use crate::engine::value::{Procedure, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

// Splits `(name init)` into the target name and the raw initializer.
fn binding_operands(form: &str, args: &Value) -> Result<(String, Value), SchemeError> {
    let shape_error = || {
        error!(
            "'{}' special form requires exactly 2 operands (name, initializer), found {:?}",
            form, args
        );
        SchemeError::Syntax(format!("'{}' expects a name and one initializer", form))
    };
    let (target, rest) = args.split().ok_or_else(shape_error)?;
    let (init, tail) = rest.split().ok_or_else(shape_error)?;
    if !tail.is_nil() {
        return Err(shape_error());
    }

    match target {
        Value::Symbol(name) => Ok((name, init)),
        other => {
            error!(target = ?other, "'{}' target must be a symbol", form);
            Err(SchemeError::Syntax(format!(
                "'{}' target must be a symbol",
                form
            )))
        }
    }
}

/// What an initializer produced: a value to bind, or nothing to bind at all.
enum Initial {
    Bind(Value),
    Skip,
}

// Numbers bind as they are, a symbol copies the number it is bound to, and a call form is
// applied. Calls to closures and nested `define`s are not applied at all and bind nothing.
fn evaluate_initializer(
    form: &str,
    init: &Value,
    env: &Rc<RefCell<Environment>>,
) -> Result<Initial, SchemeError> {
    match init {
        Value::Number(_) => Ok(Initial::Bind(init.clone())),
        Value::Symbol(source) => match env.borrow().get(source) {
            Some(number @ Value::Number(_)) => Ok(Initial::Bind(number)),
            Some(other) => {
                error!(source = %source, value = ?other, "'{}' can only copy numbers", form);
                Err(SchemeError::Runtime(format!(
                    "'{}' cannot copy the {} bound to '{}'",
                    form,
                    other.type_name(),
                    source
                )))
            }
            None => {
                error!(source = %source, "'{}' initializer names an unbound symbol", form);
                Err(SchemeError::Name(format!("unbound symbol '{}'", source)))
            }
        },
        Value::Pair(cell) => {
            let (head, operands) = {
                let pair = cell.borrow();
                (pair.first.clone(), pair.second.clone())
            };
            let procedure = match &head {
                Value::Symbol(name) => match env.borrow().get(name) {
                    Some(Value::Procedure(procedure)) => Some(procedure),
                    _ => None,
                },
                Value::Procedure(procedure) => Some(procedure.clone()),
                _ => None,
            };
            let Some(procedure) = procedure else {
                error!(head = ?head, "'{}' initializer is not a call form", form);
                return Err(SchemeError::Syntax(format!(
                    "'{}' initializer must be a number, a symbol or a call",
                    form
                )));
            };

            match &procedure {
                Procedure::Closure(_) => {
                    trace!("Initializer calls a closure, nothing to bind");
                    Ok(Initial::Skip)
                }
                Procedure::Native(native) if native.name == DEFINE => {
                    trace!("Initializer is a nested define, nothing to bind");
                    Ok(Initial::Skip)
                }
                Procedure::Native(_) => {
                    apply(&procedure, &operands, Rc::clone(env)).map(Initial::Bind)
                }
            }
        }
        other => {
            error!(init = ?other, "'{}' initializer has an unsupported shape", form);
            Err(SchemeError::Syntax(format!(
                "'{}' initializer must be a number, a symbol or a call",
                form
            )))
        }
    }
}

/// `(define name init)`: binds `name` in the root frame, replacing any previous binding.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_define(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'define' special form");
    let (name, init) = binding_operands(DEFINE, args)?;
    if let Initial::Bind(value) = evaluate_initializer(DEFINE, &init, &env)? {
        debug!(name = %name, value = ?value, "Defining variable");
        env.borrow_mut().define(name, value);
    }
    Ok(Value::Nil)
}

/// `(set! name init)`: like `define`, but `name` must already be bound.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_set(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'set!' special form");
    let (name, init) = binding_operands(SET, args)?;
    if !env.borrow().contains(&name) {
        error!(name = %name, "'set!' of an unbound variable");
        return Err(SchemeError::Name(format!("unbound symbol '{}'", name)));
    }
    if let Initial::Bind(value) = evaluate_initializer(SET, &init, &env)? {
        debug!(name = %name, value = ?value, "Rebinding variable");
        env.borrow_mut().set(&name, value);
    }
    Ok(Value::Nil)
}
