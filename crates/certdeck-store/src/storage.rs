//! Durable key-value port and its adapters.
//!
//! The store only ever reads and writes whole string values under a single
//! key. Anything that can do that (a directory of files, an embedded
//! database, browser local storage behind a bridge) can back it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use certdeck_common::persist;

use crate::error::StorageError;

/// Durable string storage addressed by key.
pub trait DurableStore {
    /// Read the value under `key`. A missing key is `Ok(None)`, not an error.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: DurableStore + ?Sized> DurableStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// One JSON file per key inside a directory. Writes are atomic.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
        {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl DurableStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        let value = persist::read_text_if_exists(&path)?;
        tracing::trace!(path = %path.display(), found = value.is_some(), "Storage read");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        persist::write_text_atomic(&path, value)?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "Storage write");
        Ok(())
    }
}

/// Process-local storage. Useful for tests and for embedders that persist
/// through some other channel.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, as if a previous session had written it.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
