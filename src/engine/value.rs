//! The tagged S-expression value model.
//!
//! Every node the reader produces and every result the evaluator returns is a [`Value`].
//! Pairs are shared by reference so that `set-car!` on a bound pair is visible to every
//! holder of that pair.

use crate::engine::env::Environment;
use crate::engine::eval::SchemeError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A cons cell. Either slot may hold [`Value::Nil`].
///
/// Chains are walked through `second` in loops, never by recursion, so a long flat list
/// can be compared, formatted and dropped on any stack.
#[derive(Clone)]
pub struct Pair {
    pub first: Value,
    pub second: Value,
}

impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.second, Value::Nil);
        while let Value::Pair(cell) = next {
            next = match Rc::try_unwrap(cell) {
                Ok(cell) => std::mem::replace(&mut cell.into_inner().second, Value::Nil),
                // Still shared: the other holder drops it later.
                Err(_) => break,
            };
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        if self.first != other.first {
            return false;
        }
        let mut left = self.second.clone();
        let mut right = other.second.clone();
        loop {
            let (next_left, next_right) = match (&left, &right) {
                (Value::Pair(a), Value::Pair(b)) => {
                    let (a, b) = (a.borrow(), b.borrow());
                    if a.first != b.first {
                        return false;
                    }
                    (a.second.clone(), b.second.clone())
                }
                _ => return left == right,
            };
            left = next_left;
            right = next_right;
        }
    }
}

// Formats the whole chain as `(a b . tail)`.
impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}", self.first)?;
        let mut cursor = self.second.clone();
        loop {
            let next = match &cursor {
                Value::Nil => return write!(f, ")"),
                Value::Pair(cell) => {
                    let pair = cell.borrow();
                    write!(f, " {:?}", pair.first)?;
                    pair.second.clone()
                }
                tail => return write!(f, " . {:?})", tail),
            };
            cursor = next;
        }
    }
}

/// Signature shared by every builtin: the raw, unevaluated argument chain and the
/// environment to evaluate it in.
pub type NativeFn = fn(&Value, Rc<RefCell<Environment>>) -> Result<Value, SchemeError>;

#[derive(Clone)]
pub struct NativeProcedure {
    pub name: &'static str, // For debugging and identification
    pub func: NativeFn,
}

impl fmt::Debug for NativeProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeProcedure")
            .field("name", &self.name)
            .field("func", &"<native_fn_ptr>")
            .finish()
    }
}

// Builtin names are unique within one environment, so the name identifies the behaviour.
impl PartialEq for NativeProcedure {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A procedure built by `lambda`.
///
/// `parent` is reserved for an enclosing scope. It is never populated and the evaluator
/// never consults it.
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Box<Value>,
    pub parent: Option<Rc<RefCell<Environment>>>,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("parent", &self.parent.as_ref().map(|_| "<captured_env>"))
            .finish()
    }
}

// Closures are equal if their parameters and body are structurally equal.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Procedure {
    Native(NativeProcedure),
    Closure(Closure),
}

impl Procedure {
    pub fn name(&self) -> &str {
        match self {
            Procedure::Native(native) => native.name,
            Procedure::Closure(_) => "<closure>",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The empty value: `()` and every unset pair slot.
    Nil,
    Pair(Rc<RefCell<Pair>>),
    Symbol(String),
    Number(i64),
    Bool(bool),
    Procedure(Procedure),
}

impl Value {
    pub fn cons(first: Value, second: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new(Pair { first, second })))
    }

    /// Builds a proper list from `items`.
    pub fn list<I>(items: I) -> Value
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: DoubleEndedIterator,
    {
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, item| Value::cons(item, tail))
    }

    pub fn symbol(name: &str) -> Value {
        Value::Symbol(name.to_string())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Only the literal `#f` is false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "empty",
            Value::Pair(_) => "pair",
            Value::Symbol(_) => "symbol",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Procedure(_) => "procedure",
        }
    }

    /// Clones both slots of a pair, or returns `None` for any other value.
    pub fn split(&self) -> Option<(Value, Value)> {
        match self {
            Value::Pair(cell) => {
                let pair = cell.borrow();
                Some((pair.first.clone(), pair.second.clone()))
            }
            _ => None,
        }
    }

    /// Number of links in a pair chain. A non-empty atom (including a dotted tail)
    /// counts as one link.
    pub fn chain_length(&self) -> usize {
        let mut length = 0;
        let mut cursor = self.clone();
        loop {
            match cursor {
                Value::Nil => return length,
                Value::Pair(cell) => {
                    length += 1;
                    let next = cell.borrow().second.clone();
                    cursor = next;
                }
                _ => return length + 1,
            }
        }
    }

    /// The value that terminates a pair chain: `Nil` for a proper list, the tail atom
    /// for a dotted one, or `self` when it is not a pair.
    pub fn chain_end(&self) -> Value {
        let mut cursor = self.clone();
        while let Value::Pair(cell) = &cursor {
            let next = cell.borrow().second.clone();
            cursor = next;
        }
        cursor
    }

    /// The elements of a pair chain, in order. A dotted tail is returned as the last element.
    pub fn chain_items(&self) -> Vec<Value> {
        let mut items = Vec::new();
        let mut cursor = self.clone();
        loop {
            match cursor {
                Value::Nil => return items,
                Value::Pair(cell) => {
                    let (first, second) = {
                        let pair = cell.borrow();
                        (pair.first.clone(), pair.second.clone())
                    };
                    items.push(first);
                    cursor = second;
                }
                atom => {
                    items.push(atom);
                    return items;
                }
            }
        }
    }
}
