//! Request groups.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Name of the group that always exists and cannot be deleted.
pub const DEFAULT_GROUP_NAME: &str = "default";

/// A named folder that requests refer to by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl Group {
    /// Whether this is the protected `"default"` group.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_GROUP_NAME
    }
}
