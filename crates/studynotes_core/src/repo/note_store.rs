//! Durable note store over the key-value port.
//!
//! # Responsibility
//! - Load the full notes structure at startup and write it back after edits.
//! - Recover from missing or malformed records with the default structure.
//!
//! # Invariants
//! - `load` and `save` never return errors; failures are logged and absorbed.
//! - The notes record always lives under [`NOTES_STORAGE_KEY`].
//! - Log events carry error codes only, never note content.

use crate::model::notes::NotesStore;
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key for the notes record.
pub const NOTES_STORAGE_KEY: &str = "study-notes";

/// Failure while reading or writing one JSON record.
#[derive(Debug)]
pub enum StoreError {
    /// Backend read failed.
    Read(RepoError),
    /// Stored value is not valid JSON for the expected shape.
    Parse(serde_json::Error),
    /// In-memory value could not be encoded.
    Serialize(serde_json::Error),
    /// Backend write failed.
    Write(RepoError),
}

impl StoreError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read(_) => "storage_read_failed",
            Self::Parse(_) => "storage_parse_failed",
            Self::Serialize(_) => "storage_serialize_failed",
            Self::Write(_) => "storage_write_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read stored record: {err}"),
            Self::Parse(err) => write!(f, "stored record is malformed: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode record: {err}"),
            Self::Write(err) => write!(f, "failed to write record: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Parse(err) | Self::Serialize(err) => Some(err),
        }
    }
}

/// Reads and decodes one JSON record; `Ok(None)` when the key is absent.
pub(crate) fn read_record<R, T>(repo: &R, key: &str) -> Result<Option<T>, StoreError>
where
    R: KeyValueRepository,
    T: DeserializeOwned,
{
    let Some(raw) = repo.get(key).map_err(StoreError::Read)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(StoreError::Parse)
}

/// Encodes and writes one JSON record.
pub(crate) fn write_record<R, T>(repo: &R, key: &str, value: &T) -> Result<(), StoreError>
where
    R: KeyValueRepository,
    T: Serialize,
{
    let encoded = serde_json::to_string(value).map_err(StoreError::Serialize)?;
    repo.put(key, &encoded).map_err(StoreError::Write)
}

/// Note store bound to one key-value repository.
pub struct NoteStore<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> NoteStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads notes, falling back to [`NotesStore::empty`] on any failure.
    pub fn load(&self) -> NotesStore {
        match self.try_load() {
            Ok(Some(store)) => {
                info!("event=notes_load module=store status=ok source=storage");
                store
            }
            Ok(None) => {
                info!("event=notes_load module=store status=ok source=default");
                NotesStore::empty()
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=store status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                NotesStore::empty()
            }
        }
    }

    /// Writes the full notes structure; failures are logged and dropped.
    pub fn save(&self, store: &NotesStore) {
        match self.try_save(store) {
            Ok(()) => debug!("event=notes_save module=store status=ok"),
            Err(err) => error!(
                "event=notes_save module=store status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
    }

    /// Fallible load; `Ok(None)` when nothing was stored yet.
    pub fn try_load(&self) -> Result<Option<NotesStore>, StoreError> {
        read_record(&self.repo, NOTES_STORAGE_KEY)
    }

    /// Fallible save.
    pub fn try_save(&self, store: &NotesStore) -> Result<(), StoreError> {
        write_record(&self.repo, NOTES_STORAGE_KEY, store)
    }
}
