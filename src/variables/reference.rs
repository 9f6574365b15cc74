//! Response reference parsing.
//!
//! A response reference is a token such as `{{"Login".token}}` that pulls a
//! value out of another request's last recorded response. The quote may also
//! appear escaped (`{{\"Login\".token}}`) when the surrounding text has been
//! through a JSON encoder.

use std::fmt;

/// Field path that selects the whole response body.
pub const FULL_RESPONSE_PATH: &str = "response";

const ESCAPED_QUOTE: &str = "\\\"";
const QUOTE: &str = "\"";

/// A decomposed `{{"Name".path}}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseReference {
    /// Name of the referenced request, verbatim between the quotes.
    pub request_name: String,
    /// Dot-separated path into the response body.
    pub field_path: String,
    /// `true` when `field_path` is `response`.
    pub is_full_response: bool,
}

/// Why a token is not a usable response reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The token is not wrapped in `{{` and `}}`.
    InvalidFormat,
    /// The content does not start with a quote; it is a plain variable.
    NotAReference,
    /// No closing quote followed by `.` was found.
    UnclosedQuote,
    EmptyRequestName,
    EmptyFieldPath,
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::InvalidFormat => write!(f, "invalid variable format"),
            ReferenceError::NotAReference => {
                write!(f, "not a response variable - doesn't start with quote")
            }
            ReferenceError::UnclosedQuote => {
                write!(f, "unclosed quote or missing field separator")
            }
            ReferenceError::EmptyRequestName => write!(f, "empty request name"),
            ReferenceError::EmptyFieldPath => write!(f, "empty field path"),
        }
    }
}

impl std::error::Error for ReferenceError {}

/// Parses a full token, delimiters included, into a [`ResponseReference`].
///
/// # Examples
///
/// ```
/// use api_workbench::variables::parse_response_reference;
///
/// let reference = parse_response_reference(r#"{{"Login".data.token}}"#).unwrap();
/// assert_eq!(reference.request_name, "Login");
/// assert_eq!(reference.field_path, "data.token");
/// assert!(!reference.is_full_response);
///
/// assert!(parse_response_reference("{{baseUrl}}").is_err());
/// ```
pub fn parse_response_reference(token: &str) -> Result<ResponseReference, ReferenceError> {
    if token.len() < 4 || !token.starts_with("{{") || !token.ends_with("}}") {
        return Err(ReferenceError::InvalidFormat);
    }

    let content = token[2..token.len() - 2].trim();

    let quote = if content.starts_with(ESCAPED_QUOTE) {
        ESCAPED_QUOTE
    } else if content.starts_with(QUOTE) {
        QUOTE
    } else {
        return Err(ReferenceError::NotAReference);
    };

    let rest = &content[quote.len()..];
    let terminator = format!("{}.", quote);
    let end = rest
        .find(&terminator)
        .ok_or(ReferenceError::UnclosedQuote)?;

    let request_name = &rest[..end];
    let field_path = &rest[end + terminator.len()..];

    if request_name.is_empty() {
        return Err(ReferenceError::EmptyRequestName);
    }
    if field_path.is_empty() {
        return Err(ReferenceError::EmptyFieldPath);
    }

    Ok(ResponseReference {
        request_name: request_name.to_string(),
        field_path: field_path.to_string(),
        is_full_response: field_path == FULL_RESPONSE_PATH,
    })
}
