//! Store error types.
//!
//! Corrupt documents and template misses never surface here: the former is
//! recovered on load, the latter is swallowed by the substitution engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`DocumentStore`](super::DocumentStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing; the store was not touched.
    #[error("{0}")]
    Validation(String),

    /// An id or name lookup found nothing.
    #[error("{0}")]
    NotFound(String),

    /// The operation would break a uniqueness or protection rule.
    #[error("{0}")]
    Conflict(String),

    /// The data file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fallback temp file could not be written.
    #[error("failed to write temp file {}: {source}", path.display())]
    TempWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every remove+rename attempt on the fallback path failed.
    #[error("failed to save after {attempts} attempts - file may be locked by another process")]
    SaveRetriesExhausted {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be encoded.
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error category, used by callers to map errors onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Persistence,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Conflict(_) => ErrorKind::Conflict,
            StoreError::Read { .. }
            | StoreError::TempWrite { .. }
            | StoreError::SaveRetriesExhausted { .. }
            | StoreError::Serialization(_) => ErrorKind::Persistence,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
