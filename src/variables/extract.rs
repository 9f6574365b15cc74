//! Field extraction from recorded response bodies.
//!
//! Misses are not errors: a missing key, or a path that runs into a
//! non-object, extracts as an empty string.

use super::reference::FULL_RESPONSE_PATH;
use crate::models::Body;
use serde_json::Value;

/// A value pulled out of a response body, ready to substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedValue {
    /// Text to substitute.
    pub value: String,
    /// `true` when `value` is encoded JSON (object, array or a whole JSON
    /// body) that may be spliced raw instead of interpolated as text.
    pub is_object: bool,
}

impl ExtractedValue {
    fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_object: false,
        }
    }

    fn json(value: String) -> Self {
        Self {
            value,
            is_object: true,
        }
    }
}

/// Extracts `field_path` from `body`.
///
/// - `response` returns a text body unchanged, or the whole JSON body encoded
///   (flagged as an object).
/// - Any other path is split on `.`, empty segments are skipped, and each
///   segment descends into an object. At the leaf a string passes through,
///   `null` becomes `""`, objects and arrays are encoded and flagged, and
///   numbers and booleans are encoded but not flagged.
///
/// # Errors
///
/// Only fails if encoding the selected JSON value fails.
///
/// # Examples
///
/// ```
/// use api_workbench::models::Body;
/// use api_workbench::variables::extract_field;
/// use serde_json::json;
///
/// let body = Body::Json(json!({"user": {"id": 42, "tags": ["a"]}}));
///
/// let id = extract_field(&body, "user.id").unwrap();
/// assert_eq!(id.value, "42");
/// assert!(!id.is_object);
///
/// let tags = extract_field(&body, "user.tags").unwrap();
/// assert_eq!(tags.value, r#"["a"]"#);
/// assert!(tags.is_object);
///
/// assert_eq!(extract_field(&body, "user.missing").unwrap().value, "");
/// ```
pub fn extract_field(body: &Body, field_path: &str) -> Result<ExtractedValue, serde_json::Error> {
    if field_path == FULL_RESPONSE_PATH {
        return match body {
            Body::Text(text) => Ok(ExtractedValue::text(text.as_str())),
            Body::Json(Value::String(text)) => Ok(ExtractedValue::text(text.as_str())),
            Body::Json(Value::Null) => Ok(ExtractedValue::text("")),
            Body::Json(value) => Ok(ExtractedValue::json(serde_json::to_string(value)?)),
        };
    }

    let root = match body {
        Body::Text(text) => Value::String(text.clone()),
        Body::Json(value) => value.clone(),
    };

    let mut current = &root;
    for segment in field_path.split('.').filter(|s| !s.is_empty()) {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None => return Ok(ExtractedValue::text("")),
            },
            _ => return Ok(ExtractedValue::text("")),
        }
    }

    leaf_value(current)
}

fn leaf_value(value: &Value) -> Result<ExtractedValue, serde_json::Error> {
    match value {
        Value::String(text) => Ok(ExtractedValue::text(text.as_str())),
        Value::Null => Ok(ExtractedValue::text("")),
        Value::Object(_) | Value::Array(_) => Ok(ExtractedValue::json(serde_json::to_string(value)?)),
        Value::Number(_) | Value::Bool(_) => Ok(ExtractedValue::text(serde_json::to_string(value)?)),
    }
}
