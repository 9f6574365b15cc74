//! Data models for saved requests, responses, environments and the persisted document.
//!
//! This module contains the core data structures shared by the store, the
//! template engine and the executor. Field names serialize in camelCase to
//! match the on-disk document format.

pub mod body;
pub mod document;
pub mod environment;
pub mod group;
pub mod request;
pub mod response;

pub use body::Body;
pub use document::Document;
pub use environment::{Environment, ResolvedVariable, Variable, DEFAULT_ENVIRONMENT_NAME};
pub use group::{Group, DEFAULT_GROUP_NAME};
pub use request::{
    method_or_default, BodyField, ProxyRequest, QueryParam, RequestDraft,
    SavedRequest, DEFAULT_METHOD,
};
pub use response::ProxyResponse;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that may be `null` on disk into its default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
