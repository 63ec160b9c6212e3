//! `sexpr`: evaluates single S-expressions of a small Scheme subset against a persistent
//! binding table.

pub mod engine;
pub mod logging;

pub use engine::eval::SchemeError;
pub use engine::interpreter::Interpreter;
