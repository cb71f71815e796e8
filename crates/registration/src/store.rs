use crate::errors::StoreError;
use crate::form::FormRecord;
use std::collections::HashMap;

/// Key under which the accepted record is written.
pub const DEFAULT_STORAGE_KEY: &str = "formData";

/// Durable key-value storage with string values.
///
/// Writes overwrite whatever the key held before.
pub trait RecordStore: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Serialize `record` to JSON and write it under `key`.
pub fn save_record(
    store: &mut dyn RecordStore,
    key: &str,
    record: &FormRecord,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(record)?;
    store.write(key, json)
}

/// Read back a record written by [`save_record`].
pub fn load_record(store: &dyn RecordStore, key: &str) -> Result<Option<FormRecord>, StoreError> {
    match store.read(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Process-local store, lost on drop.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
