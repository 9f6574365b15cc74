//! Environment and variable data models.
//!
//! Environments hold named sets of variables. Exactly one environment is
//! current at a time; its variables are what `{{key}}` tokens resolve against.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Name given to the environment synthesized for a new or migrated document.
pub const DEFAULT_ENVIRONMENT_NAME: &str = "Default";

/// A single `{key, value}` variable.
///
/// `value` is either a literal or a `$NAME` reference to a process
/// environment variable, resolved at use time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl Variable {
    /// Creates a new variable.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether the value is a `$NAME` process-environment reference.
    pub fn is_env_reference(&self) -> bool {
        self.value.starts_with('$')
    }
}

/// A named set of variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<Variable>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl Environment {
    /// Gets a variable value by key (first match in list order).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    /// Returns the number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Checks if the environment has no variables
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A variable together with its effective value, as shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariable {
    pub key: String,
    pub value: String,
    pub resolved_value: String,
    pub is_env_var: bool,
}
