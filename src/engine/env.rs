use crate::engine::builtins::globals::populate_globals;
use crate::engine::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// A binding frame. The interpreter only ever uses a single root frame, but frames can
/// be chained through `outer`.
#[derive(Debug, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Creates a new, empty root environment without any builtins.
    pub fn new() -> Rc<RefCell<Self>> {
        debug!("Creating new empty root environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: None,
        }))
    }

    /// Creates a new root environment holding every builtin procedure and special form.
    pub fn new_with_prelude() -> Rc<RefCell<Self>> {
        debug!("Creating new root environment with prelude");
        let env_rc = Environment::new();
        populate_globals(&env_rc);
        trace!(bindings = env_rc.borrow().bindings.len(), "Environment after adding prelude");
        env_rc
    }

    /// Creates a new environment that is enclosed by an outer environment.
    pub fn new_enclosed(outer_env: Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        debug!("Creating new enclosed environment");
        Rc::new(RefCell::new(Environment {
            bindings: HashMap::new(),
            outer: Some(outer_env),
        }))
    }

    /// Defines a new variable or redefines an existing one in the current environment.
    pub fn define(&mut self, name: String, value: Value) {
        trace!(name = %name, value = ?value, "Defining variable in current environment");
        self.bindings.insert(name, value);
    }

    /// Rebinds an existing variable in the nearest frame that holds it.
    /// Returns `false` when no frame binds `name`.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            trace!(name = %name, value = ?value, "Rebinding variable in current environment");
            *slot = value;
            return true;
        }
        match &self.outer {
            Some(outer_env) => outer_env.borrow_mut().set(name, value),
            None => {
                debug!(name = %name, "Cannot rebind: variable not found in any environment");
                false
            }
        }
    }

    /// Attempts to retrieve a variable's value from the environment.
    /// If not found in the current environment, it searches in outer environments.
    pub fn get(&self, name: &str) -> Option<Value> {
        trace!(name = %name, "Attempting to get variable from environment");
        if let Some(value) = self.bindings.get(name) {
            Some(value.clone())
        } else {
            match &self.outer {
                Some(outer_env) => {
                    trace!(name = %name, "Variable not in current environment, checking outer environment");
                    outer_env.borrow().get(name)
                }
                None => {
                    debug!(name = %name, "Variable not found in any environment");
                    None
                }
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
            || self
                .outer
                .as_ref()
                .is_some_and(|outer_env| outer_env.borrow().contains(name))
    }

    /// The bound value of `name`, or the symbol itself when it is unbound.
    /// Used by the printer; evaluation fails hard on unbound names instead.
    pub fn resolve(&self, name: &str) -> Value {
        self.get(name).unwrap_or_else(|| Value::Symbol(name.to_string()))
    }
}
