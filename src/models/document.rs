//! The persisted document: every request, environment, group and setting.

use super::environment::{Environment, Variable, DEFAULT_ENVIRONMENT_NAME};
use super::group::{Group, DEFAULT_GROUP_NAME};
use super::null_as_default;
use super::request::SavedRequest;
use super::response::ProxyResponse;
use crate::store::ids::{generate_id, now_timestamp};
use crate::variables::ResponseSource;
use serde::{Deserialize, Serialize};

/// The single unit written to the data file.
///
/// Every field tolerates being absent or `null` on disk so that partially
/// written or legacy documents still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: Vec<SavedRequest>,

    /// Legacy flat variable list, superseded by environments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<Variable>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub environments: Vec<Environment>,

    /// Id of the current environment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_environment: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub word_wrap: bool,
}

impl Document {
    /// Creates a fresh document with one empty "Default" environment.
    pub fn new_default() -> Self {
        let environment = new_environment(DEFAULT_ENVIRONMENT_NAME, Vec::new());
        Self {
            current_environment: environment.id.clone(),
            environments: vec![environment],
            ..Default::default()
        }
    }

    /// Looks up a request by id.
    pub fn request(&self, id: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn request_mut(&mut self, id: &str) -> Option<&mut SavedRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }

    /// Looks up a request by exact, case-sensitive name.
    pub fn request_by_name(&self, name: &str) -> Option<&SavedRequest> {
        self.requests.iter().find(|r| r.name == name)
    }

    /// Whether a request other than `except_id` already uses `name`.
    pub fn request_name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        self.requests
            .iter()
            .any(|r| r.name == name && Some(r.id.as_str()) != except_id)
    }

    pub fn request_names(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.name.clone()).collect()
    }

    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    pub fn environment_mut(&mut self, id: &str) -> Option<&mut Environment> {
        self.environments.iter_mut().find(|e| e.id == id)
    }

    /// The environment named by `currentEnvironment`, if it exists.
    pub fn current_environment(&self) -> Option<&Environment> {
        self.environment(&self.current_environment)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn has_group_named(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.name == name)
    }

    /// Whether any request is filed under the group `name`.
    pub fn group_in_use(&self, name: &str) -> bool {
        self.requests.iter().any(|r| r.group == name)
    }

    /// Whether the protected default group is present.
    pub fn has_default_group(&self) -> bool {
        self.has_group_named(DEFAULT_GROUP_NAME)
    }
}

impl ResponseSource for Document {
    fn last_response(&self, request_name: &str) -> Option<ProxyResponse> {
        self.request_by_name(request_name)
            .and_then(|r| r.last_response.clone())
    }
}

/// Builds an environment with a fresh id and matching timestamps.
pub(crate) fn new_environment(name: &str, variables: Vec<Variable>) -> Environment {
    let now = now_timestamp();
    Environment {
        id: generate_id(),
        name: name.to_string(),
        variables,
        created_at: now.clone(),
        updated_at: now,
    }
}

/// Builds a group with a fresh id and matching timestamps.
pub(crate) fn new_group(name: &str) -> Group {
    let now = now_timestamp();
    Group {
        id: generate_id(),
        name: name.to_string(),
        created_at: now.clone(),
        updated_at: now,
    }
}
