//! Validation errors.

use serde_json::Value;
use thiserror::Error;

use crate::value::ValueKind;

pub type Result<T> = std::result::Result<T, ValidationError>;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("payload ({actual} bytes) exceeds the max size of {limit} bytes")]
    SizeExceeded { actual: usize, limit: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object at the root of the instance, got `{actual}`")]
    NonObjectInstance { actual: ValueKind },

    #[error("invalid schema at `{path}`: {reason}")]
    InvalidSchema { path: String, reason: String },

    #[error("expected key `{path}` in the instance according to the schema")]
    MissingKey { path: String },

    #[error("key `{path}` does not exist in the schema")]
    UnexpectedKey { path: String },

    #[error("expected `{expected}` at `{path}` but encountered `{actual}`")]
    TypeMismatch { path: String, expected: String, actual: ValueKind },

    #[error("value `{value}` at `{path}` did not pass `{predicate}`")]
    PredicateFailed { path: String, predicate: String, value: Value },
}

/// Coarse classification of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SizeExceeded,
    Deserialization,
    InvalidSchemaDefinition,
    MissingKey,
    UnexpectedKey,
    TypeMismatch,
    PredicateFailed,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            ValidationError::InvalidJson(_)
            | ValidationError::NonObjectInstance { .. } => ErrorKind::Deserialization,
            ValidationError::InvalidSchema { .. } => ErrorKind::InvalidSchemaDefinition,
            ValidationError::MissingKey { .. } => ErrorKind::MissingKey,
            ValidationError::UnexpectedKey { .. } => ErrorKind::UnexpectedKey,
            ValidationError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ValidationError::PredicateFailed { .. } => ErrorKind::PredicateFailed,
        }
    }

    /// Key path the error points at, when it has one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidSchema { path, .. }
            | ValidationError::MissingKey { path }
            | ValidationError::UnexpectedKey { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::PredicateFailed { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn invalid_schema(path: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidSchema {
            path: if path.is_empty() { "$".to_string() } else { path.to_string() },
            reason: reason.into(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// KEY PATHS
// ————————————————————————————————————————————————————————————————————————————

/// `parent.key`, or just `key` at the root.
pub(crate) fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() { key.to_string() } else { format!("{parent}.{key}") }
}

/// `parent[i]`
pub(crate) fn join_index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
