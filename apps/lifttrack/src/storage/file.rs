use std::fmt::Write as _;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use super::{KvBackend, StorageError};

/// Durable backend: one JSON file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the data directory. A directory that
    /// cannot be created is logged; the store still opens and its reads and
    /// writes fail individually.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match std::fs::create_dir_all(&dir) {
            Ok(()) => info!("File store opened at {}", dir.display()),
            Err(e) => error!("Cannot create data directory {}: {e}", dir.display()),
        }
        Self { dir }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem_for_key(key)))
    }
}

impl KvBackend for FileStore {
    fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temp file in the same directory, then renames it over
    /// the target so a crash never leaves a half-written value behind.
    fn write_raw(&self, key: &str, raw: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StorageError::Io(e.error))?;
        debug!("Wrote {} bytes to {}", raw.len(), path.display());
        Ok(())
    }
}

/// Maps a storage key to a safe file stem. Coach-mode keys embed a
/// user-typed token, so anything outside `[A-Za-z0-9_-]` is hex-escaped.
fn file_stem_for_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            let _ = write!(stem, "%{byte:02x}");
        }
    }
    stem
}
