//! Core domain logic for the study-notes app.
//! This crate is the single source of truth for note storage, merging,
//! segmentation of generated text and generation request building.

pub mod db;
pub mod generation;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod segment;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use generation::assistant::build_assistant_request;
pub use generation::config::GenerationConfig;
pub use generation::request::{
    build_generation_request, GenerationMode, GenerationParameters, GenerationPayload,
    GenerationRequest,
};
pub use generation::response::{extract_generated_text, GenerationError};
pub use generation::GenerationClient;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notes::{NotesStore, SubjectNotes};
pub use model::progress::StudyProgress;
pub use model::subject::{BlockNumber, BlockNumberError, Subject, BLOCKS_PER_SUBJECT};
pub use repo::kv_repo::{
    InMemoryKeyValueRepository, KeyValueRepository, RepoError, RepoResult,
    SqliteKeyValueRepository,
};
pub use repo::note_store::{NoteStore, StoreError};
pub use repo::progress_store::ProgressStore;
pub use search::notes_search::{search_notes, NoteSearchHit, NotesSearchQuery};
pub use segment::{
    segment_full_curriculum, segment_single_block, Segmentation, SegmentationStrategy,
};
pub use service::merge::{merge_block_set, merge_single_block};
pub use service::note_service::NoteService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
