use crate::engine::env::Environment;
use crate::engine::eval::{SchemeError, eval as main_eval};
use crate::engine::value::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace};

/// `(if condition [then [else]])`.
///
/// The condition is evaluated only when it is a call form; any other atom is taken as
/// written. Only `#f` is false. A missing branch yields the empty value.
#[instrument(skip(args, env), fields(args = ?args), ret, err)]
pub fn eval_if(args: &Value, env: Rc<RefCell<Environment>>) -> Result<Value, SchemeError> {
    trace!("Executing 'if' special form");
    let operands = args.chain_items();
    if operands.is_empty() || operands.len() > 3 {
        error!(
            "'if' special form requires 1 to 3 operands (condition, [then-branch], [else-branch]), found {}",
            operands.len()
        );
        return Err(SchemeError::Syntax(format!(
            "'if' expects 1 to 3 operands, got {}",
            operands.len()
        )));
    }

    let condition = match &operands[0] {
        call @ Value::Pair(_) => main_eval(call, Rc::clone(&env))?,
        literal => literal.clone(),
    };
    debug!(?condition, "Evaluated 'if' condition");

    let branch = if condition.is_truthy() {
        trace!("Condition is truthy, selecting then-branch");
        operands.get(1)
    } else {
        trace!("Condition is false, selecting else-branch");
        operands.get(2)
    };
    match branch {
        Some(branch) => main_eval(branch, env),
        None => {
            trace!("No branch to evaluate, returning empty");
            Ok(Value::Nil)
        }
    }
}
