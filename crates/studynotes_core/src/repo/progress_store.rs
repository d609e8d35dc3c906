//! Durable study progress store.
//!
//! Same recovery policy as the note store: read and write failures are
//! logged and absorbed.

use crate::model::progress::StudyProgress;
use crate::repo::kv_repo::KeyValueRepository;
use crate::repo::note_store::{read_record, write_record, StoreError};
use log::{debug, error, warn};

/// Fixed storage key for the progress record.
pub const PROGRESS_STORAGE_KEY: &str = "studyProgress";

pub struct ProgressStore<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> ProgressStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads progress, falling back to no completed blocks.
    pub fn load(&self) -> StudyProgress {
        match self.try_load() {
            Ok(progress) => progress.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=progress_load module=store status=fallback error_code={} error={}",
                    err.code(),
                    err
                );
                StudyProgress::new()
            }
        }
    }

    pub fn save(&self, progress: &StudyProgress) {
        match write_record(&self.repo, PROGRESS_STORAGE_KEY, progress) {
            Ok(()) => debug!("event=progress_save module=store status=ok"),
            Err(err) => error!(
                "event=progress_save module=store status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
    }

    pub fn try_load(&self) -> Result<Option<StudyProgress>, StoreError> {
        read_record(&self.repo, PROGRESS_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::{ProgressStore, PROGRESS_STORAGE_KEY};
    use crate::model::progress::StudyProgress;
    use crate::model::subject::{BlockNumber, Subject};
    use crate::repo::kv_repo::{InMemoryKeyValueRepository, KeyValueRepository};

    #[test]
    fn progress_survives_save_and_load() {
        let repo = InMemoryKeyValueRepository::new();
        let store = ProgressStore::new(&repo);
        let mut progress = store.load();
        progress.toggle(Subject::French, BlockNumber::new(3).unwrap());
        store.save(&progress);

        assert_eq!(
            repo.get(PROGRESS_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"french-3":true}"#)
        );
        assert_eq!(ProgressStore::new(&repo).load(), progress);
    }

    #[test]
    fn malformed_progress_falls_back_to_empty() {
        let repo = InMemoryKeyValueRepository::with_entry(PROGRESS_STORAGE_KEY, "[1,2]");
        assert_eq!(ProgressStore::new(repo).load(), StudyProgress::new());
    }
}
