//! Template substitution engine
//!
//! This module replaces `{{...}}` tokens in request text. Resolution runs in
//! two passes over each string:
//!
//! 1. Response references (`{{"Name".path}}`, any token containing a quote)
//!    are resolved against the named request's last recorded response. When
//!    the extracted value is a JSON object or array and the token sits inside
//!    a JSON string (`"{{"Name".obj}}"`), the quoted token is replaced by the
//!    raw JSON so the result nests structurally.
//! 2. Each variable of the current environment replaces `{{key}}`.
//!
//! Any token that cannot be resolved is left in place. Nested braces are not
//! supported.

use super::environment::resolve_variable_value;
use super::extract::{extract_field, ExtractedValue};
use super::reference::parse_response_reference;
use crate::models::{Body, ProxyRequest, ProxyResponse, Variable};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// Cached regex pattern for matching `{{...}}` tokens.
static TOKEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^}]*\}\}").expect("Failed to compile token regex"));

/// Where response references look up recorded responses.
///
/// Implemented by [`Document`](crate::models::Document) for lookups against
/// an already-loaded snapshot, and by
/// [`DocumentStore`](crate::store::DocumentStore), which reloads the file.
pub trait ResponseSource {
    /// Returns the last recorded response of the request named exactly `request_name`.
    fn last_response(&self, request_name: &str) -> Option<ProxyResponse>;
}

/// Substitutes every resolvable token in `input`.
///
/// # Arguments
///
/// * `input` - Text containing `{{...}}` tokens
/// * `variables` - The current environment's variables, applied in order
/// * `responses` - Source for response references
///
/// # Returns
///
/// The substituted text. Unresolvable tokens remain as written.
///
/// # Example
///
/// ```
/// use api_workbench::models::{Document, Variable};
/// use api_workbench::variables::substitute;
///
/// let variables = vec![Variable::new("host", "localhost:8080")];
/// let result = substitute("http://{{host}}/users/{{id}}", &variables, &Document::default());
/// assert_eq!(result, "http://localhost:8080/users/{{id}}");
/// ```
pub fn substitute(input: &str, variables: &[Variable], responses: &dyn ResponseSource) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut result = input.to_string();

    for token in response_tokens(input) {
        let Some(extracted) = resolve_response_token(token, responses) else {
            continue;
        };

        if extracted.is_object {
            let quoted = format!("\"{}\"", token);
            if result.contains(&quoted) {
                result = result.replace(&quoted, &extracted.value);
                continue;
            }
        }
        result = result.replace(token, &extracted.value);
    }

    for variable in variables.iter().filter(|v| !v.key.is_empty()) {
        let placeholder = format!("{{{{{}}}}}", variable.key);
        if result.contains(&placeholder) {
            let value = resolve_variable_value(&variable.value);
            result = result.replace(&placeholder, &value);
        }
    }

    result
}

/// Resolves every templated field of `request`.
///
/// The URL and each header key and value are substituted independently. The
/// body is rendered to text, substituted, and decoded back into JSON when the
/// result is valid JSON. The method is left as is.
pub fn resolve_request(
    request: &ProxyRequest,
    variables: &[Variable],
    responses: &dyn ResponseSource,
) -> ProxyRequest {
    let url = substitute(&request.url, variables, responses);

    let headers: BTreeMap<String, String> = request
        .headers
        .iter()
        .map(|(key, value)| {
            (
                substitute(key, variables, responses),
                substitute(value, variables, responses),
            )
        })
        .collect();

    let body_text = substitute(&request.body.to_text(), variables, responses);

    ProxyRequest {
        url,
        method: request.method.clone(),
        headers,
        body: Body::from_text(&body_text),
    }
}

/// Distinct tokens that look like response references, in order of first appearance.
fn response_tokens(input: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    TOKEN_REGEX
        .find_iter(input)
        .map(|m| m.as_str())
        .filter(|token| token.contains('"'))
        .filter(|token| seen.insert(*token))
        .collect()
}

fn resolve_response_token(token: &str, responses: &dyn ResponseSource) -> Option<ExtractedValue> {
    let reference = match parse_response_reference(token) {
        Ok(reference) => reference,
        Err(e) => {
            debug!("Skipping token {}: {}", token, e);
            return None;
        }
    };

    let Some(response) = responses.last_response(&reference.request_name) else {
        warn!(
            "No recorded response for request '{}', leaving {} unresolved",
            reference.request_name, token
        );
        return None;
    };

    match extract_field(&response.body, &reference.field_path) {
        Ok(extracted) => {
            debug!(
                "Resolved {} from '{}' (object: {})",
                token, reference.request_name, extracted.is_object
            );
            Some(extracted)
        }
        Err(e) => {
            warn!("Could not extract {} from '{}': {}", reference.field_path, reference.request_name, e);
            None
        }
    }
}
