//! Names of the special forms. They are bound in the environment like any builtin, but
//! receive their operands unevaluated and decide themselves what to evaluate.

// Constants for individual special form names, can be used for matching.
pub const QUOTE: &str = "quote";
pub const IF: &str = "if";
pub const DEFINE: &str = "define";
pub const SET: &str = "set!";
pub const LAMBDA: &str = "lambda";
pub const AND: &str = "and";
pub const OR: &str = "or";

/// Array of special form names.
pub const SPECIAL_FORMS: &[&str] = &[QUOTE, IF, DEFINE, SET, LAMBDA, AND, OR];

/// Checks if a given name is a special form.
///
/// # Arguments
/// * `name` - The name to check.
///
/// # Returns
/// `true` if the name is a special form, `false` otherwise.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_special_form() {
        assert!(is_special_form("quote"));
        assert!(is_special_form("if"));
        assert!(is_special_form("define"));
        assert!(is_special_form("set!"));
        assert!(is_special_form("lambda"));
        assert!(is_special_form("and"));
        assert!(is_special_form("or"));
        assert!(!is_special_form("list"));
        assert!(!is_special_form("car"));
        assert!(!is_special_form(""));
    }
}
