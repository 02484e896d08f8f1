//! Workout and recovery repositories.
//!
//! A repository owns the in-memory collection for one identity and writes the
//! whole collection through to storage on every append. Collections are
//! always newest-first.
//!
//! A stored value that cannot be decoded is never overwritten: the collection
//! loads as empty and appends are refused until the value is repaired.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::identity::short_id;
use crate::models::{RecoveryLog, WorkoutLog};
use crate::storage::{KvBackend, Storage, StorageError, Stored};

pub mod recovery_book;
pub mod seed;

use recovery_book::RecoveryBook;

const KEY_PREFIX: &str = "lifttrack";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Workouts,
    Recovery,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Workouts => "workouts",
            RecordKind::Recovery => "recovery",
        }
    }

    /// Storage key for this kind of record under `identity`.
    pub fn storage_key(&self, identity: &str) -> String {
        format!("{KEY_PREFIX}-{}-{identity}", self.as_str())
    }
}

/// A persisted record type.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    /// Data seeded for the owner the first time nothing is stored.
    fn sample_set(now: DateTime<Utc>) -> Vec<Self>;

    /// Adds `new` to a newest-first collection.
    fn insert(records: Vec<Self>, new: Self) -> Vec<Self>;
}

impl Record for WorkoutLog {
    const KIND: RecordKind = RecordKind::Workouts;

    fn sample_set(now: DateTime<Utc>) -> Vec<Self> {
        seed::sample_workouts(now)
    }

    fn insert(mut records: Vec<Self>, new: Self) -> Vec<Self> {
        records.insert(0, new);
        records
    }
}

impl Record for RecoveryLog {
    const KIND: RecordKind = RecordKind::Recovery;

    fn sample_set(now: DateTime<Utc>) -> Vec<Self> {
        seed::sample_recovery_logs(now.date_naive())
    }

    fn insert(records: Vec<Self>, new: Self) -> Vec<Self> {
        let mut book = RecoveryBook::from_newest_first(records);
        if let Some(replaced) = book.upsert(new) {
            debug!("Replaced recovery log {} for {}", replaced.id, replaced.date);
        }
        book.into_newest_first()
    }
}

pub type WorkoutRepository<'s, B> = Repository<'s, WorkoutLog, B>;
pub type RecoveryRepository<'s, B> = Repository<'s, RecoveryLog, B>;

pub struct Repository<'s, R: Record, B: KvBackend> {
    storage: &'s Storage<B>,
    owner_id: String,
    identity: String,
    records: Vec<R>,
    unreadable: bool,
}

impl<'s, R: Record, B: KvBackend> Repository<'s, R, B> {
    pub fn new(storage: &'s Storage<B>, owner_id: &str) -> Self {
        Self {
            storage,
            owner_id: owner_id.to_string(),
            identity: String::new(),
            records: Vec::new(),
            unreadable: false,
        }
    }

    /// Loads the collection stored for `identity`.
    ///
    /// Seeds the sample set only when `identity` is the owner and no value is
    /// stored at all. A stored empty list stays empty. Other identities with
    /// nothing stored get an empty collection, as does any identity whose
    /// stored value is unreadable.
    pub fn load(&mut self, identity: &str) -> &[R] {
        self.identity = identity.to_string();
        self.unreadable = false;
        if identity.is_empty() {
            self.records = Vec::new();
            return &self.records;
        }

        let key = R::KIND.storage_key(identity);
        self.records = match self.storage.read::<Vec<R>>(&key) {
            Stored::Present(stored) => stored,
            Stored::Absent if identity == self.owner_id => {
                let seeded = R::sample_set(Utc::now());
                info!(
                    "Seeding {} sample {} for owner {}",
                    seeded.len(),
                    R::KIND.as_str(),
                    short_id(identity)
                );
                self.storage.set(&key, &seeded);
                seeded
            }
            Stored::Absent => Vec::new(),
            Stored::Unreadable => {
                warn!("Leaving unreadable '{key}' untouched");
                self.unreadable = true;
                Vec::new()
            }
        };
        &self.records
    }

    /// Adds `record` to the loaded identity's collection and persists the
    /// whole collection. A no-op when no identity is loaded or when the
    /// stored collection could not be read.
    pub fn append(&mut self, record: R) -> &[R] {
        if self.identity.is_empty() {
            debug!("Skipping {} write: no active identity", R::KIND.as_str());
            return &self.records;
        }
        if self.unreadable {
            warn!(
                "Skipping {} write: stored collection for {} is unreadable",
                R::KIND.as_str(),
                short_id(&self.identity)
            );
            return &self.records;
        }

        let records = std::mem::take(&mut self.records);
        self.records = R::insert(records, record);
        self.storage
            .set(&R::KIND.storage_key(&self.identity), &self.records);
        &self.records
    }

    /// Fails when the loaded collection is unreadable, so callers can report
    /// that an append will not be saved.
    pub fn ensure_writable(&self) -> Result<(), StorageError> {
        if self.unreadable {
            return Err(StorageError::Unreadable(R::KIND.storage_key(&self.identity)));
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn records(&self) -> &[R] {
        &self.records
    }
}
