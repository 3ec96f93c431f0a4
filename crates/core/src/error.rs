//! Error types for the clinform core.
//!
//! Every error here is recovered locally by the caller: validation and missing-patient errors
//! abort the operation before anything is written, lookups that fail are given an explicit
//! fallback, and storage failures leave the in-memory collections exactly as they were.

use std::path::PathBuf;

/// A blocking, user-facing validation failure. Nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required fields left blank at save time, by label in form order.
    #[error("please fill in required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error("please add at least one field to the form")]
    NoFields,
    #[error("field id '{0}' is used more than once in the template")]
    DuplicateFieldId(String),
    #[error("template name cannot be empty")]
    EmptyName,
}

/// Failure to persist a collection.
///
/// Failures to *read* or *parse* a persisted collection are deliberately not errors: the
/// collection is treated as empty and a warning is logged.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create storage directory {path}: {source}", path = path.display())]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid collection key '{0}' (only alphanumeric, '-', '_' allowed)")]
    InvalidKey(String),
    #[error("failed to read collection '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write collection '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize collection '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("please select a patient")]
    MissingPatient,
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render printable report: {0}")]
    Print(#[from] minijinja::Error),
}

impl FormError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        FormError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FormError::NotFound { .. })
    }
}

pub type FormResult<T> = std::result::Result<T, FormError>;
pub type StorageResult<T> = std::result::Result<T, StorageError>;
