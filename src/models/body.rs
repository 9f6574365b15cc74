//! Request and response body representation.
//!
//! Bodies are persisted either as plain text or as decoded JSON. Keeping the
//! two shapes apart lets the template engine decide between splicing raw JSON
//! and interpolating text without re-parsing the value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A body that is either plain text or an already-decoded JSON value.
///
/// Serializes untagged: text becomes a JSON string, JSON is written as-is.
/// On deserialization a JSON string always becomes [`Body::Text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// Raw text that is not (or was never parsed as) JSON.
    Text(String),
    /// A decoded JSON value (object, array, number, bool or null).
    Json(Value),
}

impl Default for Body {
    fn default() -> Self {
        Body::Text(String::new())
    }
}

impl Body {
    /// Decodes `text` as JSON when possible, otherwise keeps it as text.
    ///
    /// Blank text stays text. A JSON string literal (`"\"abc\""`) decodes to
    /// its inner string and is returned as [`Body::Text`].
    ///
    /// # Examples
    ///
    /// ```
    /// use api_workbench::models::Body;
    /// use serde_json::json;
    ///
    /// assert_eq!(Body::from_text(r#"{"a":1}"#), Body::Json(json!({"a": 1})));
    /// assert_eq!(Body::from_text("a=1&b=2"), Body::Text("a=1&b=2".to_string()));
    /// ```
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Body::Text(text.to_string());
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::String(inner)) => Body::Text(inner),
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text.to_string()),
        }
    }

    /// Builds a body from raw response bytes (lossy UTF-8, then [`Body::from_text`]).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(bytes))
    }

    /// Returns the body in its canonical stored form.
    ///
    /// Text that parses as JSON is decoded; `null` collapses to empty text.
    pub fn normalize(self) -> Self {
        match self {
            Body::Text(text) => Body::from_text(&text),
            Body::Json(Value::Null) => Body::default(),
            Body::Json(Value::String(text)) => Body::Text(text),
            json => json,
        }
    }

    /// Renders the body as the text that goes over the wire.
    ///
    /// Text passes through, JSON is re-encoded compactly.
    pub fn to_text(&self) -> String {
        match self {
            Body::Text(text) => text.clone(),
            Body::Json(Value::Null) => String::new(),
            Body::Json(value) => value.to_string(),
        }
    }

    /// Whether this is stored as text that would decode to structured JSON.
    ///
    /// Used by the load-time migration that upgrades legacy string bodies.
    pub fn is_undecoded_json(&self) -> bool {
        match self {
            Body::Text(text) => matches!(Body::from_text(text), Body::Json(_)),
            Body::Json(_) => false,
        }
    }

    /// Returns `true` for empty text or JSON `null`.
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Text(text) => text.is_empty(),
            Body::Json(value) => value.is_null(),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}
