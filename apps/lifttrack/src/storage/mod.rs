//! Key-value persistence adapter.
//!
//! `Storage` is the only thing repositories and the identity resolver talk to.
//! Reads that fail for any reason come back as `None` (or `Stored::Unreadable`
//! for callers that must tell a broken value from a missing one); writes that
//! fail are logged and dropped. Callers never see a storage error.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Stored value under '{0}' is unreadable")]
    Unreadable(String),
}

/// Outcome of a typed read.
#[derive(Debug, PartialEq)]
pub enum Stored<T> {
    /// Nothing is stored under the key.
    Absent,
    Present(T),
    /// Something is stored (or the backend failed) but it does not decode as `T`.
    Unreadable,
}

/// Raw string storage under string keys.
/// Backends may fail; the `Storage` wrapper decides what a failure means.
pub trait KvBackend: Send + Sync {
    fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write_raw(&self, key: &str, raw: &str) -> Result<(), StorageError>;
}

/// Typed JSON view over a `KvBackend`.
pub struct Storage<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns the value stored under `key`, or `None` if it is missing,
    /// unreadable, or does not parse as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read(key) {
            Stored::Present(value) => Some(value),
            Stored::Absent | Stored::Unreadable => None,
        }
    }

    /// Like `get`, but keeps "nothing stored" apart from "stored and broken".
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Stored<T> {
        let raw = match self.backend.read_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Stored::Absent,
            Err(e) => {
                error!("Error reading '{key}' from storage: {e}");
                return Stored::Unreadable;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Stored::Present(value),
            Err(e) => {
                error!("Error parsing '{key}' from storage: {e}");
                Stored::Unreadable
            }
        }
    }

    /// Serializes `value` and writes it under `key`. Failures are logged and
    /// the write is dropped; there is no retry.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Dropping write to '{key}': serialization failed: {e}");
                return;
            }
        };

        if let Err(e) = self.backend.write_raw(key, &raw) {
            error!("Error writing '{key}' to storage: {e}");
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
