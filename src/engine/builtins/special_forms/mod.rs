// Declare modules for each special form
pub mod define_form;
pub mod if_form;
pub mod lambda_form;
pub mod logic_form;
pub mod quote_form;

// Re-export public evaluation functions
pub use define_form::{eval_define, eval_set};
pub use if_form::eval_if;
pub use lambda_form::eval_lambda;
pub use logic_form::{eval_and, eval_or};
pub use quote_form::eval_quote;
