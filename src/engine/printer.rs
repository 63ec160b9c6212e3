use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use crate::engine::value::Value;
use tracing::{error, instrument};

// Deeper structures (in practice: cycles made with `set-car!`) are refused.
const MAX_PRINT_DEPTH: usize = 1_000;

/// Renders a top-level result.
///
/// A bound symbol prints as the value it is bound to; an unbound one prints its own name.
/// Symbols nested inside pairs always print their own name.
#[instrument(level = "debug", skip(value, env), ret, err)]
pub fn display(value: &Value, env: &Environment) -> Result<String, SchemeError> {
    let shown = match value {
        Value::Symbol(name) => env.resolve(name),
        other => other.clone(),
    };
    let mut out = String::new();
    write_value(&shown, &mut out, 0)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut String, depth: usize) -> Result<(), SchemeError> {
    match value {
        Value::Nil => out.push_str("()"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Bool(true) => out.push_str("#t"),
        Value::Bool(false) => out.push_str("#f"),
        Value::Symbol(name) => out.push_str(name),
        Value::Procedure(procedure) => {
            error!(procedure = %procedure.name(), "Procedures have no printed form");
            return Err(SchemeError::Runtime(format!(
                "cannot print procedure '{}'",
                procedure.name()
            )));
        }
        Value::Pair(_) => {
            out.push('(');
            write_chain(value, out, depth + 1)?;
            out.push(')');
        }
    }
    Ok(())
}

// Writes the elements of a pair chain, without the surrounding brackets.
fn write_chain(chain: &Value, out: &mut String, depth: usize) -> Result<(), SchemeError> {
    if depth > MAX_PRINT_DEPTH {
        error!(depth, "Structure too deep to print");
        return Err(SchemeError::Runtime(
            "structure too deep to print".to_string(),
        ));
    }
    let mut cursor = chain.clone();
    let mut leading = true;
    loop {
        let (first, second) = match cursor.split() {
            Some(slots) => slots,
            None => return Ok(()),
        };
        if !leading {
            out.push(' ');
        }
        leading = false;
        write_value(&first, out, depth)?;
        match second {
            Value::Nil => return Ok(()),
            Value::Pair(_) => cursor = second,
            tail => {
                out.push_str(" . ");
                write_value(&tail, out, depth)?;
                return Ok(());
            }
        }
    }
}
