//! Notes store data model.
//!
//! # Responsibility
//! - Define the persisted subject -> block -> HTML content structure.
//! - Keep structural sharing cheap for copy-on-write updates.
//!
//! # Invariants
//! - Every `NotesStore` value contains an entry for every known subject.
//! - A missing block key means "no note yet"; an empty string is a note.
//! - Note content is opaque and never inspected here.
//! - Subject entries are shared via `Arc`; replacing one subject never copies
//!   the others.

use crate::model::subject::{BlockNumber, Subject};
use log::warn;
use once_cell::sync::Lazy;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Block-number to HTML content mapping for one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectNotes {
    blocks: BTreeMap<BlockNumber, String>,
}

impl SubjectNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns stored content for one block, if any.
    pub fn get(&self, block: BlockNumber) -> Option<&str> {
        self.blocks.get(&block).map(String::as_str)
    }

    /// Inserts or replaces one block and returns the previous content.
    pub fn insert(&mut self, block: BlockNumber, content: impl Into<String>) -> Option<String> {
        self.blocks.insert(block, content.into())
    }

    pub fn contains(&self, block: BlockNumber) -> bool {
        self.blocks.contains_key(&block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates stored blocks in ascending block order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockNumber, &str)> {
        self.blocks
            .iter()
            .map(|(block, content)| (*block, content.as_str()))
    }
}

impl FromIterator<(BlockNumber, String)> for SubjectNotes {
    fn from_iter<I: IntoIterator<Item = (BlockNumber, String)>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// Full persisted notes structure.
///
/// Cloning is shallow: subject entries are reference counted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, SubjectNotes>")]
pub struct NotesStore {
    subjects: BTreeMap<Subject, Arc<SubjectNotes>>,
}

impl NotesStore {
    /// Default structure: every known subject with no blocks.
    pub fn empty() -> Self {
        Self {
            subjects: Subject::ALL
                .into_iter()
                .map(|subject| (subject, Arc::new(SubjectNotes::new())))
                .collect(),
        }
    }

    /// Returns notes for one subject.
    pub fn subject(&self, subject: Subject) -> &SubjectNotes {
        // Constructors guarantee every subject is present.
        match self.subjects.get(&subject) {
            Some(notes) => notes,
            None => empty_subject_notes(),
        }
    }

    /// Returns the shared handle for one subject.
    ///
    /// Exposed so callers can observe structural sharing across updates.
    pub fn subject_handle(&self, subject: Subject) -> Option<&Arc<SubjectNotes>> {
        self.subjects.get(&subject)
    }

    /// Returns stored content for one block.
    pub fn block(&self, subject: Subject, block: BlockNumber) -> Option<&str> {
        self.subject(subject).get(block)
    }

    /// Iterates all subjects in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Subject, &SubjectNotes)> {
        self.subjects
            .iter()
            .map(|(subject, notes)| (*subject, notes.as_ref()))
    }

    /// Returns a new store with one subject's block mapping replaced.
    ///
    /// All other subject entries are shared with `self`.
    pub fn with_subject(&self, subject: Subject, notes: SubjectNotes) -> Self {
        let mut subjects = self.subjects.clone();
        subjects.insert(subject, Arc::new(notes));
        Self { subjects }
    }
}

impl Default for NotesStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<BTreeMap<String, SubjectNotes>> for NotesStore {
    fn from(raw: BTreeMap<String, SubjectNotes>) -> Self {
        let mut store = Self::empty();
        for (key, notes) in raw {
            match Subject::parse(&key) {
                Some(subject) => {
                    store.subjects.insert(subject, Arc::new(notes));
                }
                None => {
                    warn!("event=notes_decode module=model status=skipped reason=unknown_subject");
                }
            }
        }
        store
    }
}

impl Serialize for NotesStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.subjects.len()))?;
        for (subject, notes) in &self.subjects {
            map.serialize_entry(subject.as_str(), notes.as_ref())?;
        }
        map.end()
    }
}

fn empty_subject_notes() -> &'static SubjectNotes {
    static EMPTY: Lazy<SubjectNotes> = Lazy::new(SubjectNotes::new);
    &EMPTY
}

#[cfg(test)]
mod tests {
    use super::{NotesStore, SubjectNotes};
    use crate::model::subject::{BlockNumber, Subject};
    use std::sync::Arc;

    fn block(value: i64) -> BlockNumber {
        BlockNumber::new(value).unwrap()
    }

    #[test]
    fn empty_store_covers_every_subject() {
        let store = NotesStore::empty();
        assert_eq!(store.iter().count(), Subject::ALL.len());
        assert!(store.iter().all(|(_, notes)| notes.is_empty()));
    }

    #[test]
    fn with_subject_shares_untouched_entries() {
        let store = NotesStore::empty();
        let mut chemistry = SubjectNotes::new();
        chemistry.insert(block(1), "<p>A</p>");

        let next = store.with_subject(Subject::Chemistry, chemistry);
        assert_eq!(next.block(Subject::Chemistry, block(1)), Some("<p>A</p>"));
        assert!(Arc::ptr_eq(
            store.subject_handle(Subject::Biology).unwrap(),
            next.subject_handle(Subject::Biology).unwrap()
        ));
        assert_eq!(store.block(Subject::Chemistry, block(1)), None);
    }

    #[test]
    fn subject_borrows_from_the_store() {
        let mut arabic = SubjectNotes::new();
        arabic.insert(block(2), "<p>grammar</p>");
        let store = NotesStore::empty().with_subject(Subject::Arabic, arabic);

        let notes = store.subject(Subject::Arabic);
        assert_eq!(notes.get(block(2)), Some("<p>grammar</p>"));
        assert!(store.subject(Subject::Social).is_empty());
    }

    #[test]
    fn decode_fills_missing_subjects_and_drops_unknown_ones() {
        let json = r#"{"physics":{"2":"<p>forces</p>"},"latin":{"1":"x"}}"#;
        let store: NotesStore = serde_json::from_str(json).unwrap();
        assert_eq!(store.block(Subject::Physics, block(2)), Some("<p>forces</p>"));
        assert_eq!(store.iter().count(), Subject::ALL.len());
    }

    #[test]
    fn encode_uses_lowercase_subjects_and_string_block_keys() {
        let mut maths = SubjectNotes::new();
        maths.insert(block(6), "");
        let store = NotesStore::empty().with_subject(Subject::Maths, maths);

        let value = serde_json::to_value(&store).unwrap();
        assert_eq!(value["maths"]["6"], "");
        assert!(value["biology"].as_object().unwrap().is_empty());
    }
}
