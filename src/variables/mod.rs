//! Template resolution for outgoing requests
//!
//! This module resolves `{{...}}` tokens in URLs, headers and bodies from two
//! sources: the current environment's variables (with `$NAME` indirection to
//! the process environment) and fields of other requests' last recorded
//! responses.

pub mod environment;
pub mod extract;
pub mod reference;
pub mod substitution;

pub use environment::resolve_variable_value;
pub use extract::{extract_field, ExtractedValue};
pub use reference::{parse_response_reference, ReferenceError, ResponseReference};
pub use substitution::{resolve_request, substitute, ResponseSource};
