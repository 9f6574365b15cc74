//! Environment variable resolution.
//!
//! A variable's stored value is either a literal or a `$NAME` indirection to
//! the process environment, resolved every time it is used.

use std::env;

/// Resolves a variable's stored value to its effective value.
///
/// Values starting with `$` name a process environment variable. When that
/// variable is unset, empty or not valid Unicode, the original `$NAME` string
/// is returned so the miss stays visible in the outgoing request.
///
/// # Arguments
///
/// * `value` - The stored variable value
///
/// # Returns
///
/// The process environment value, or `value` unchanged
///
/// # Example
///
/// ```
/// use api_workbench::variables::resolve_variable_value;
///
/// assert_eq!(resolve_variable_value("localhost"), "localhost");
/// assert_eq!(
///     resolve_variable_value("$SURELY_NOT_SET_IN_ANY_SHELL"),
///     "$SURELY_NOT_SET_IN_ANY_SHELL"
/// );
/// ```
pub fn resolve_variable_value(value: &str) -> String {
    let Some(name) = value.strip_prefix('$') else {
        return value.to_string();
    };

    match env::var(name) {
        Ok(resolved) if !resolved.is_empty() => resolved,
        _ => value.to_string(),
    }
}
