//! Copy-on-write merge of partial note updates.
//!
//! # Responsibility
//! - Apply one-block and multi-block updates to a notes structure.
//!
//! # Invariants
//! - Only the targeted blocks of the named subject change.
//! - Untouched subject entries are shared with the input, not copied.
//! - An unknown subject identifier is a logged no-op, never a panic.
//! - Identifiers match only in their exact lowercase form.

use crate::model::notes::NotesStore;
use crate::model::subject::{BlockNumber, Subject};
use log::warn;
use std::collections::BTreeMap;

/// Returns a new store with `store[subject][block] = content`.
///
/// `subject` is the raw identifier coming from the caller; identifiers
/// outside the known lowercase set return an unchanged clone of `store`.
pub fn merge_single_block(
    store: &NotesStore,
    subject: &str,
    block: BlockNumber,
    content: impl Into<String>,
) -> NotesStore {
    let Some(subject) = resolve_subject(subject) else {
        return store.clone();
    };

    let mut notes = store.subject(subject).clone();
    notes.insert(block, content);
    store.with_subject(subject, notes)
}

/// Returns a new store where every entry of `blocks` overwrites
/// `store[subject][key]`; blocks absent from `blocks` are preserved.
pub fn merge_block_set(
    store: &NotesStore,
    subject: &str,
    blocks: &BTreeMap<BlockNumber, String>,
) -> NotesStore {
    let Some(subject) = resolve_subject(subject) else {
        return store.clone();
    };
    if blocks.is_empty() {
        return store.clone();
    }

    let mut notes = store.subject(subject).clone();
    for (block, content) in blocks {
        notes.insert(*block, content.as_str());
    }
    store.with_subject(subject, notes)
}

/// Exact lowercase identifier match; no trimming or case folding.
fn resolve_subject(subject: &str) -> Option<Subject> {
    let resolved = Subject::ALL
        .into_iter()
        .find(|known| known.as_str() == subject);
    if resolved.is_none() {
        warn!("event=notes_merge module=merge status=skipped reason=unknown_subject");
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::{merge_block_set, merge_single_block};
    use crate::model::notes::NotesStore;
    use crate::model::subject::{BlockNumber, Subject};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn block(value: i64) -> BlockNumber {
        BlockNumber::new(value).unwrap()
    }

    fn seeded() -> NotesStore {
        let store = merge_single_block(&NotesStore::empty(), "chemistry", block(3), "<p>old</p>");
        let store = merge_single_block(&store, "chemistry", block(5), "<p>keep</p>");
        merge_single_block(&store, "physics", block(1), "<p>physics</p>")
    }

    #[test]
    fn single_block_changes_only_the_target() {
        let before = seeded();
        let after = merge_single_block(&before, "physics", block(2), "<p>new</p>");

        assert_eq!(after.block(Subject::Physics, block(2)), Some("<p>new</p>"));
        assert_eq!(after.block(Subject::Physics, block(1)), Some("<p>physics</p>"));
        for subject in Subject::ALL.into_iter().filter(|s| *s != Subject::Physics) {
            assert!(Arc::ptr_eq(
                before.subject_handle(subject).unwrap(),
                after.subject_handle(subject).unwrap()
            ));
        }
        assert_eq!(before.block(Subject::Physics, block(2)), None);
    }

    #[test]
    fn block_set_overwrites_targets_and_preserves_the_rest() {
        let before = seeded();
        let update = BTreeMap::from([
            (block(1), "<p>A</p>".to_string()),
            (block(3), "<p>B</p>".to_string()),
        ]);

        let after = merge_block_set(&before, "chemistry", &update);
        let chemistry = after.subject(Subject::Chemistry);
        assert_eq!(chemistry.get(block(1)), Some("<p>A</p>"));
        assert_eq!(chemistry.get(block(3)), Some("<p>B</p>"));
        assert_eq!(chemistry.get(block(5)), Some("<p>keep</p>"));
        assert_eq!(chemistry.len(), 3);
        assert_eq!(after.subject(Subject::Physics), before.subject(Subject::Physics));
    }

    #[test]
    fn unknown_subject_is_a_no_op() {
        let before = seeded();
        let after = merge_single_block(&before, "latin", block(1), "<p>salve</p>");
        assert_eq!(after, before);

        let update = BTreeMap::from([(block(2), "x".to_string())]);
        assert_eq!(merge_block_set(&before, "latin", &update), before);
    }

    #[test]
    fn non_canonical_identifiers_are_no_ops() {
        let before = seeded();
        let update = BTreeMap::from([(block(1), "<p>A</p>".to_string())]);
        for raw in [" Chemistry ", "Chemistry", "CHEMISTRY", "chemistry "] {
            assert_eq!(merge_single_block(&before, raw, block(1), "<p>x</p>"), before);
            assert_eq!(merge_block_set(&before, raw, &update), before);
        }
        assert_eq!(before.block(Subject::Chemistry, block(1)), None);
    }

    #[test]
    fn empty_string_is_stored_distinct_from_absent() {
        let after = merge_single_block(&NotesStore::empty(), "maths", block(6), "");
        assert_eq!(after.block(Subject::Maths, block(6)), Some(""));
        assert_eq!(after.block(Subject::Maths, block(5)), None);
    }
}
