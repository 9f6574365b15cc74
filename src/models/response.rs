//! Executor response data model.
//!
//! [`ProxyResponse`] is both what an executor returns and what the store keeps
//! as a request's `lastResponse`.

use super::body::Body;
use super::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The result of executing a request.
///
/// `body` holds decoded JSON whenever the raw response text was valid JSON,
/// otherwise plain text. Transport failures leave `status_code` at 0 and put
/// the reason in `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// Status line, e.g. `"200 OK"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status_code: u16,

    /// Response headers (first value of each).
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProxyResponse {
    /// Creates a response with the given status code and status line.
    pub fn new(status_code: u16, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            status_code,
            ..Default::default()
        }
    }

    /// Creates a failed response carrying only an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Sets the body, decoding it from text when it is valid JSON.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into().normalize();
        self
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.insert(key, value);
    }

    /// Returns the response with its body in canonical stored form.
    pub fn normalized(mut self) -> Self {
        self.body = self.body.normalize();
        self
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Whether the executor reported a failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
