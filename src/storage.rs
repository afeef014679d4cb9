//! Durable client-side key/value storage.
//!
//! The browser storefront keeps favorites and UI flags in `localStorage`;
//! here the same contract is a small trait over string keys and JSON string
//! values, with a file-backed implementation for real use and an in-memory
//! one for tests and ephemeral sessions.

use std::{
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::warn;

/// String key/value storage with `localStorage` semantics: reads of absent
/// or unreadable keys yield `None`, writes are best-effort and never fail
/// past this boundary.
#[automock]
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str);

    /// Remove `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str);
}

/// File-backed storage: each key is a `<key>.json` file under a state
/// directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                warn!(key, "failed to read stored value: {error}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(error) = fs::create_dir_all(&self.dir) {
            warn!(key, "failed to create state directory: {error}");
            return;
        }

        if let Err(error) = fs::write(self.path_for(key), value) {
            warn!(key, "failed to persist value: {error}");
        }
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => warn!(key, "failed to remove stored value: {error}"),
        }
    }
}

/// In-memory storage for tests and sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn file_storage_round_trips_values() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.read("favorites"), None);

        storage.write("favorites", "[1,2,3]");
        assert_eq!(storage.read("favorites").as_deref(), Some("[1,2,3]"));

        storage.remove("favorites");
        assert_eq!(storage.read("favorites"), None);

        Ok(())
    }

    #[test]
    fn file_storage_remove_absent_key_is_noop() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().to_path_buf());

        storage.remove("missing");

        Ok(())
    }

    #[test]
    fn memory_storage_overwrites() {
        let storage = MemoryStorage::new();

        storage.write("cart_open", "true");
        storage.write("cart_open", "false");

        assert_eq!(storage.read("cart_open").as_deref(), Some("false"));
    }
}
