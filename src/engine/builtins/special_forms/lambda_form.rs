use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use crate::engine::value::{Closure, Procedure, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

fn malformed(message: &str) -> SchemeError {
    error!("Malformed 'lambda': {}", message);
    SchemeError::Runtime(format!("malformed lambda: {}", message))
}

/// `(lambda (params...) body...)`: builds a closure. Nothing is evaluated here.
#[instrument(skip(args, _env), fields(args = ?args), ret, err)]
pub fn eval_lambda(args: &Value, _env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'lambda' special form");
    let (params_list, body) = args
        .split()
        .ok_or_else(|| malformed("expected a parameter list and a body"))?;
    if !matches!(body, Value::Pair(_)) {
        return Err(malformed("missing body"));
    }

    if !params_list.chain_end().is_nil() {
        return Err(malformed("parameter list must be a proper list"));
    }
    let params = params_list
        .chain_items()
        .into_iter()
        .map(|param| match param {
            Value::Symbol(name) => Ok(name),
            other => Err(malformed(&format!(
                "parameter must be a symbol, found {:?}",
                other
            ))),
        })
        .collect::<Result<Vec<String>, SchemeError>>()?;

    debug!(?params, "Created closure");
    Ok(Value::Procedure(Procedure::Closure(Closure {
        params,
        body: Box::new(body),
        parent: None,
    })))
}
