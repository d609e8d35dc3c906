//! Domain model for study notes.
//!
//! # Responsibility
//! - Define the subject/block identifiers and the persisted notes structure.
//! - Keep serialization shape stable for durable storage.
//!
//! # Invariants
//! - Subjects form a closed set; block numbers stay within `1..=6`.
//! - Notes structures are replaced, never mutated in place, once shared.

pub mod notes;
pub mod progress;
pub mod subject;
