//! Search entry points.
//!
//! # Responsibility
//! - Expose keyword search over the in-memory notes structure.
//! - Keep result shaping (snippets, ordering, limits) inside core.

pub mod notes_search;
