//! The evaluator core: lexer, reader, value model, environment, evaluator, builtins and
//! printer, tied together by [`interpreter::Interpreter`].

pub mod builtins;
pub mod env;
pub mod eval;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod special_forms;
pub mod value;
