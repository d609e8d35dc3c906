//! Study progress model.
//!
//! # Responsibility
//! - Track which subject blocks a student marked as studied.
//! - Derive the overall completion percentage.
//!
//! # Invariants
//! - Wire format is `{"<subject>-<block>": bool}`; `false` entries are kept
//!   out of memory so counts only reflect completed blocks.
//! - Percentage denominator is every subject times every block.

use crate::model::subject::{BlockNumber, Subject, BLOCKS_PER_SUBJECT};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Completed subject blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct StudyProgress {
    completed: BTreeSet<(Subject, BlockNumber)>,
}

impl StudyProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips completion for one block and returns the new state.
    pub fn toggle(&mut self, subject: Subject, block: BlockNumber) -> bool {
        let key = (subject, block);
        if self.completed.remove(&key) {
            false
        } else {
            self.completed.insert(key);
            true
        }
    }

    pub fn is_completed(&self, subject: Subject, block: BlockNumber) -> bool {
        self.completed.contains(&(subject, block))
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Completed share of all subject blocks, rounded to a whole percent.
    pub fn percent_complete(&self) -> u8 {
        let total = Subject::ALL.len() * usize::from(BLOCKS_PER_SUBJECT);
        let percent = (self.completed.len() as f64 / total as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u8
    }

    /// Completed blocks for one subject in ascending order.
    pub fn completed_blocks(&self, subject: Subject) -> Vec<BlockNumber> {
        self.completed
            .iter()
            .filter(|(current, _)| *current == subject)
            .map(|(_, block)| *block)
            .collect()
    }
}

fn progress_key(subject: Subject, block: BlockNumber) -> String {
    format!("{}-{}", subject.as_str(), block)
}

fn parse_progress_key(key: &str) -> Option<(Subject, BlockNumber)> {
    let (subject, block) = key.rsplit_once('-')?;
    let subject = Subject::parse(subject)?;
    let block = BlockNumber::parse(block).ok()?;
    Some((subject, block))
}

impl From<BTreeMap<String, bool>> for StudyProgress {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        let mut completed = BTreeSet::new();
        for (key, done) in raw {
            if !done {
                continue;
            }
            match parse_progress_key(&key) {
                Some(entry) => {
                    completed.insert(entry);
                }
                None => {
                    warn!("event=progress_decode module=model status=skipped reason=invalid_key");
                }
            }
        }
        Self { completed }
    }
}

impl From<StudyProgress> for BTreeMap<String, bool> {
    fn from(progress: StudyProgress) -> Self {
        progress
            .completed
            .into_iter()
            .map(|(subject, block)| (progress_key(subject, block), true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::StudyProgress;
    use crate::model::subject::{BlockNumber, Subject};

    fn block(value: i64) -> BlockNumber {
        BlockNumber::new(value).unwrap()
    }

    #[test]
    fn toggle_flips_completion() {
        let mut progress = StudyProgress::new();
        assert!(progress.toggle(Subject::Biology, block(2)));
        assert!(progress.is_completed(Subject::Biology, block(2)));
        assert!(!progress.toggle(Subject::Biology, block(2)));
        assert_eq!(progress.completed_count(), 0);
    }

    #[test]
    fn percent_rounds_over_all_subject_blocks() {
        let mut progress = StudyProgress::new();
        assert_eq!(progress.percent_complete(), 0);
        for value in 1..=6 {
            progress.toggle(Subject::Physics, block(value));
        }
        // 6 of 54 blocks.
        assert_eq!(progress.percent_complete(), 11);
    }

    #[test]
    fn wire_format_uses_subject_dash_block_keys() {
        let mut progress = StudyProgress::new();
        progress.toggle(Subject::Ict, block(4));
        let value = serde_json::to_value(&progress).unwrap();
        assert_eq!(value["ict-4"], true);

        let decoded: StudyProgress =
            serde_json::from_str(r#"{"ict-4":true,"maths-1":false,"bogus":true}"#).unwrap();
        assert_eq!(decoded, progress);
    }
}
