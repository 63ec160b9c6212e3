use crate::engine::builtins::list::{
    native_car, native_cdr, native_cons, native_list_ref, native_list_tail, native_set_car,
};
use crate::engine::builtins::math::{
    native_abs, native_add, native_divide, native_equals, native_greater_than,
    native_greater_than_or_equal, native_less_than, native_less_than_or_equal, native_max,
    native_min, native_multiply, native_subtract,
};
use crate::engine::builtins::predicates::{
    native_is_boolean, native_is_list, native_is_null, native_is_number, native_is_pair,
    native_is_symbol, native_not,
};
use crate::engine::builtins::special_forms::{
    eval_and, eval_define, eval_if, eval_lambda, eval_or, eval_quote, eval_set,
};
use crate::engine::env::Environment;
use crate::engine::special_forms::{AND, DEFINE, IF, LAMBDA, OR, QUOTE, SET};
use crate::engine::value::{NativeFn, NativeProcedure, Procedure, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

// `list` shares its behaviour with `quote`: the operands come back unevaluated.
const GLOBALS: &[(&str, NativeFn)] = &[
    (QUOTE, eval_quote),
    ("number?", native_is_number),
    ("=", native_equals),
    (">", native_greater_than),
    ("<", native_less_than),
    (">=", native_greater_than_or_equal),
    ("<=", native_less_than_or_equal),
    ("+", native_add),
    ("-", native_subtract),
    ("*", native_multiply),
    ("/", native_divide),
    ("max", native_max),
    ("min", native_min),
    ("abs", native_abs),
    ("boolean?", native_is_boolean),
    ("not", native_not),
    (AND, eval_and),
    (OR, eval_or),
    ("pair?", native_is_pair),
    ("null?", native_is_null),
    ("list?", native_is_list),
    ("cdr", native_cdr),
    ("car", native_car),
    ("cons", native_cons),
    ("list", eval_quote),
    ("list-ref", native_list_ref),
    ("list-tail", native_list_tail),
    (IF, eval_if),
    (DEFINE, eval_define),
    ("symbol?", native_is_symbol),
    (SET, eval_set),
    ("set-car!", native_set_car),
    (LAMBDA, eval_lambda),
];

/// Populates the given environment with every builtin procedure and special form.
pub fn populate_globals(env: &Rc<RefCell<Environment>>) {
    let mut root_env_borrowed = env.borrow_mut();
    for &(name, func) in GLOBALS {
        root_env_borrowed.define(
            name.to_string(),
            Value::Procedure(Procedure::Native(NativeProcedure { name, func })),
        );
    }
    debug!(count = GLOBALS.len(), "Populated global bindings");
}
