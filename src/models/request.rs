//! Saved request and outbound request data models.
//!
//! A [`SavedRequest`] is what the store persists. A [`RequestDraft`] carries
//! the user-editable fields for create/update operations, and a
//! [`ProxyRequest`] is the fully-templated request handed to an executor.

use super::body::Body;
use super::null_as_default;
use super::response::ProxyResponse;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Method used when a request does not specify one.
pub const DEFAULT_METHOD: &str = "GET";

/// Returns `method`, or [`DEFAULT_METHOD`] when it is empty.
pub fn method_or_default(method: &str) -> String {
    if method.is_empty() {
        DEFAULT_METHOD.to_string()
    } else {
        method.to_string()
    }
}

/// A query-string parameter row as edited in the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParam {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
}

/// A key/value body row (JSON builder or form body).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyField {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
}

/// A named request definition persisted in the document.
///
/// Names are unique (case-sensitive) across the whole document; `id` is
/// assigned once at creation and never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,

    /// Legacy body field, text or decoded JSON.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub body_type: String,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub body_text: String,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub body_json: Vec<BodyField>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub body_form: Vec<BodyField>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<QueryParam>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// The most recent response recorded for this request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_response: Option<ProxyResponse>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl SavedRequest {
    /// Builds the outbound request for this definition (before templating).
    pub fn to_proxy_request(&self) -> ProxyRequest {
        ProxyRequest {
            url: self.url.clone(),
            method: method_or_default(&self.method),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Overwrites the user-editable fields from `draft`.
    ///
    /// `last_response` is only replaced when the draft carries one.
    pub(crate) fn apply_draft(&mut self, draft: RequestDraft) {
        self.name = draft.name;
        self.url = draft.url;
        self.method = draft.method;
        self.headers = draft.headers;
        self.body = draft.body.normalize();
        self.body_type = draft.body_type;
        self.body_text = draft.body_text;
        self.body_json = draft.body_json;
        self.body_form = draft.body_form;
        self.params = draft.params;
        self.group = draft.group;
        self.description = draft.description;
        if let Some(response) = draft.last_response {
            self.last_response = Some(response.normalized());
        }
    }
}

/// User-supplied fields for creating or updating a [`SavedRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDraft {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_json: Vec<BodyField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body_form: Vec<BodyField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub params: Vec<QueryParam>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_response: Option<ProxyResponse>,
}

impl RequestDraft {
    /// Creates a draft with a name, method and URL; everything else empty.
    pub fn new(name: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets a header, replacing any existing value.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the legacy body.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the group name.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// A request as sent to an executor: URL, method, headers and body.
///
/// Templates are resolved before execution; see
/// [`crate::variables::resolve_request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: Body,
}

impl ProxyRequest {
    /// Creates a request with no headers and an empty body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: BTreeMap::new(),
            body: Body::default(),
        }
    }

    /// Adds a header to the request.
    pub fn add_header(&mut self, key: String, value: String) {
        self.headers.insert(key, value);
    }
}
