//! Named-collection storage.
//!
//! Persisted state is a set of independently addressable collections, each one JSON document
//! under a string key. [`Storage`] is the seam between the stores and the medium:
//!
//! - [`MemoryStorage`] keeps collections in a map, for tests and embedding.
//! - [`FileStorage`] keeps each collection in `<data_dir>/<key>.json`.
//!
//! ## Atomicity
//!
//! A collection is always written whole. [`FileStorage`] writes to a temporary sibling file and
//! renames it over the target, so a reader sees either the previous or the new collection and
//! never a half-written one.
//!
//! ## Fail-open reads
//!
//! [`load_collection`] never fails: a missing, unreadable or malformed collection is treated as
//! "no prior state" and comes back empty, with a warning logged. Losing a malformed collection
//! is preferred over blocking the user.

use crate::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A key/value store of serialized collections.
pub trait Storage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

impl<T: Storage + ?Sized> Storage for Box<T> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// In-memory collections.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection with raw content, valid or not.
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per collection under a data directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (creating if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DirCreation`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::DirCreation {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let write_err = |source| StorageError::Write {
            key: key.to_owned(),
            source,
        };

        fs::write(&tmp, value).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            // The target is untouched; only the temporary file needs to go.
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

/// Keys become file stems, so they are restricted to a conservative ASCII set.
fn validate_key(key: &str) -> StorageResult<()> {
    const MAX_KEY_LEN: usize = 128;

    let ok = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

/// Reads a JSON array collection, failing open to an empty collection.
pub fn load_collection<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    load_document(storage, key).unwrap_or_default()
}

/// Reads any JSON document; `None` when absent, unreadable or malformed.
pub fn load_document<T, S>(storage: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("treating collection '{}' as empty: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("discarding malformed collection '{}': {}", key, e);
            None
        }
    }
}

/// Serializes and writes a whole document under `key`.
pub fn persist_document<T, S>(storage: &mut S, key: &str, value: &T) -> StorageResult<()>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_owned(),
        source,
    })?;
    storage.set_item(key, &raw)
}
