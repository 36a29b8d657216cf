//! Durable string-keyed client storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for browser local storage. Multi-key writes and removals are a
//! single operation so the identity store never persists half a record.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::ClientError;

/// Key-value storage that survives process restarts (or, for tests, doesn't).
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist every entry or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the backing medium rejects the write.
    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), ClientError>;

    /// Remove every key; absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Storage`] if the backing medium rejects the write.
    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError>;
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local storage. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), ClientError> {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            map.insert((*key).to_owned(), value.clone());
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

// =============================================================================
// JSON FILE
// =============================================================================

/// Storage backed by a single JSON object file.
///
/// Every mutation rewrites the whole file through a temp file + rename, so a
/// crash mid-write leaves either the old or the new contents on disk.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// Open `path`, treating a missing or unreadable file as empty.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries: Mutex::new(entries) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&self, mutate: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), ClientError> {
        let mut current = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = current.clone();
        mutate(&mut next);
        write_entries(&self.path, &next)?;
        *current = next;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, String)]) -> Result<(), ClientError> {
        self.commit(|map| {
            for (key, value) in entries {
                map.insert((*key).to_owned(), value.clone());
            }
        })
    }

    fn remove_all(&self, keys: &[&str]) -> Result<(), ClientError> {
        self.commit(|map| {
            for key in keys {
                map.remove(*key);
            }
        })
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "identity file unreadable; starting empty");
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "identity file corrupt; starting empty");
            BTreeMap::new()
        }
    }
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
    let json = serde_json::to_string_pretty(entries).map_err(|e| ClientError::Storage(e.to_string()))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ClientError::Storage(format!("{}: {e}", parent.display())))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(|e| ClientError::Storage(format!("{}: {e}", tmp.display())))?;
    fs::rename(&tmp, path).map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))
}
