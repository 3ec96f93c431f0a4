//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the stores. Core code
//! never reads environment variables itself; the `*_from_env_value` helpers take the raw value
//! the binary looked up.

use crate::constants::DEFAULT_DATA_DIR;
use crate::error::{FormError, FormResult};
use crate::repositories::records::RecordCollection;
use crate::storage::FileStorage;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    record_collection: RecordCollection,
}

impl CoreConfig {
    pub fn new(data_dir: PathBuf, record_collection: RecordCollection) -> FormResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(FormError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self {
            data_dir,
            record_collection,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn record_collection(&self) -> &RecordCollection {
        &self.record_collection
    }

    /// Opens file-backed storage over the data directory, creating it if needed.
    pub fn storage(&self) -> FormResult<FileStorage> {
        Ok(FileStorage::open(&self.data_dir)?)
    }
}

/// Resolve the data directory from an optional raw value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse the record collection from an optional short name.
///
/// If `value` is `None` or empty/whitespace, returns the generic reports collection.
pub fn record_collection_from_env_value(value: Option<String>) -> FormResult<RecordCollection> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(name) => RecordCollection::from_name(&name),
        None => Ok(RecordCollection::reports()),
    }
}
