use crate::errors::StoreError;
use crate::store::RecordStore;
use fs2::FileExt;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// JsonFileStore: file-backed store holding one JSON object of string values.
///
/// Notes:
/// - The whole object is kept in memory; every write rewrites the file.
/// - Persist writes a temporary file and renames it into place; an advisory lock
///   is acquired around the write for cross-process safety.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStore {
    /// Open (or prepare to create) the store at `path`.
    /// Parent directories are created on first write, not here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::read_entries(&path)?;
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, picking up writes from other processes.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.entries = Self::read_entries(&self.path)?;
        Ok(())
    }

    fn read_entries(path: &Path) -> Result<Map<String, Value>, StoreError> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject(path.to_path_buf())),
        }
    }

    /// Acquires an exclusive lock on the backing file (creating it if needed),
    /// runs the closure and releases the lock.
    fn with_lock<F, R>(&self, mut f: F) -> Result<R, StoreError>
    where
        F: FnMut(&File) -> Result<R, StoreError>,
    {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let res = f(&file);
        file.unlock()?;
        res
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        self.with_lock(|_file| {
            let mut f = File::create(&tmp)?;
            f.write_all(&bytes)?;
            f.sync_all()?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        })
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entries.get(key) {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(StoreError::NotAString(key.to_string())),
            None => Ok(None),
        }
    }

    /// The in-memory view only changes once the file write succeeded.
    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), Value::String(value));
        self.persist(&entries)?;
        self.entries = entries;
        info!(key, path = %self.path.display(), "record persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.read("formData").unwrap(), None);
        store.write("formData", r#"{"city":"Grasse"}"#.into()).unwrap();
        store.write("other", "x".into()).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.read("formData").unwrap().as_deref(),
            Some(r#"{"city":"Grasse"}"#)
        );
        assert_eq!(reopened.read("other").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::NotAnObject(_))
        ));
    }

    #[test]
    fn failed_write_leaves_entries_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut store = JsonFileStore::open(blocker.join("storage.json")).unwrap();
        assert!(store.write("formData", "v".into()).is_err());
        assert_eq!(store.read("formData").unwrap(), None);
    }

    #[test]
    fn reload_sees_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut a = JsonFileStore::open(&path).unwrap();
        let mut b = JsonFileStore::open(&path).unwrap();
        b.write("formData", "late".into()).unwrap();

        assert_eq!(a.read("formData").unwrap(), None);
        a.reload().unwrap();
        assert_eq!(a.read("formData").unwrap().as_deref(), Some("late"));
    }
}
