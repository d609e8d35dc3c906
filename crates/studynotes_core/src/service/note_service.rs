//! Note use-case service.
//!
//! # Responsibility
//! - Own the session's current notes structure and its durable store.
//! - Route every input path (manual edit, curriculum import, single-block
//!   formatting) through the merge functions and persist afterwards.
//! - Run the generation pipeline: build, call, segment, merge, persist.
//!
//! # Invariants
//! - The in-memory structure is replaced, never mutated in place.
//! - Every replacement is followed by a save attempt.
//! - A failed generation leaves notes untouched.

use crate::generation::assistant::build_assistant_request;
use crate::generation::request::{build_generation_request, GenerationMode, GenerationRequest};
use crate::generation::response::GenerationError;
use crate::generation::GenerationClient;
use crate::model::notes::NotesStore;
use crate::model::subject::{BlockNumber, Subject};
use crate::repo::kv_repo::KeyValueRepository;
use crate::repo::note_store::NoteStore;
use crate::segment::{segment_full_curriculum, segment_single_block, Segmentation};
use crate::service::merge::{merge_block_set, merge_single_block};
use log::{error, info};
use std::collections::BTreeMap;
use std::time::Instant;

/// Note service facade over a key-value repository.
pub struct NoteService<R: KeyValueRepository> {
    store: NoteStore<R>,
    notes: NotesStore,
}

impl<R: KeyValueRepository> NoteService<R> {
    /// Loads notes from `repo` (or defaults) and returns a ready service.
    pub fn open(repo: R) -> Self {
        let store = NoteStore::new(repo);
        let notes = store.load();
        Self { store, notes }
    }

    /// Current notes structure.
    pub fn notes(&self) -> &NotesStore {
        &self.notes
    }

    /// Returns stored content for one block.
    pub fn block(&self, subject: Subject, block: BlockNumber) -> Option<&str> {
        self.notes.block(subject, block)
    }

    /// Saves one manually edited block.
    pub fn save_block(
        &mut self,
        subject: &str,
        block: BlockNumber,
        content: impl Into<String>,
    ) -> &NotesStore {
        let next = merge_single_block(&self.notes, subject, block, content);
        self.replace(next)
    }

    /// Saves a set of blocks for one subject, keeping the others.
    pub fn import_blocks(
        &mut self,
        subject: &str,
        blocks: &BTreeMap<BlockNumber, String>,
    ) -> &NotesStore {
        let next = merge_block_set(&self.notes, subject, blocks);
        self.replace(next)
    }

    /// Segments already generated text per request mode and merges it.
    pub fn apply_generated_text(&mut self, request: &GenerationRequest, text: &str) -> Segmentation {
        let segmentation = match request.mode {
            GenerationMode::FullCurriculum => segment_full_curriculum(text),
            GenerationMode::SingleBlock(block) => segment_single_block(block, text),
        };
        self.import_blocks(request.subject.as_str(), &segmentation.blocks);
        segmentation
    }

    /// Runs one generation action end to end.
    ///
    /// # Errors
    /// - Propagates the client's [`GenerationError`]; notes stay unchanged.
    pub fn generate<C: GenerationClient>(
        &mut self,
        client: &C,
        request: &GenerationRequest,
    ) -> Result<Segmentation, GenerationError> {
        let started_at = Instant::now();
        let payload = build_generation_request(request);
        info!(
            "event=notes_generate module=service status=start subject={} mode={} source_bytes={}",
            request.subject,
            request.mode.as_str(),
            request.source_text.len()
        );

        let text = client.generate(&payload).map_err(|err| {
            error!(
                "event=notes_generate module=service status=error subject={} mode={} duration_ms={} error={}",
                request.subject,
                request.mode.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            err
        })?;

        let segmentation = self.apply_generated_text(request, &text);
        info!(
            "event=notes_generate module=service status=ok subject={} mode={} strategy={} blocks={} duration_ms={}",
            request.subject,
            request.mode.as_str(),
            segmentation.strategy.as_str(),
            segmentation.blocks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(segmentation)
    }

    /// Asks the study assistant a question about one subject's notes.
    pub fn ask<C: GenerationClient>(
        &self,
        client: &C,
        subject: Subject,
        question: &str,
    ) -> Result<String, GenerationError> {
        let payload = build_assistant_request(&self.notes, subject, question);
        let answer = client.generate(&payload);
        match &answer {
            Ok(_) => info!("event=assistant_ask module=service status=ok subject={subject}"),
            Err(err) => error!(
                "event=assistant_ask module=service status=error subject={subject} error={err}"
            ),
        }
        answer
    }

    fn replace(&mut self, next: NotesStore) -> &NotesStore {
        self.notes = next;
        self.store.save(&self.notes);
        &self.notes
    }
}
