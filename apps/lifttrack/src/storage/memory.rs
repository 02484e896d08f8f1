use std::collections::HashMap;
use std::sync::Mutex;

use super::{KvBackend, StorageError};

/// Process-local backend. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KvBackend for MemoryStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn write_raw(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }
}
