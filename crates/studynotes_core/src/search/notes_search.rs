//! Substring search over stored notes.
//!
//! # Responsibility
//! - Find blocks whose content contains the query text.
//! - Return typed hits with a plain-text snippet.
//!
//! # Invariants
//! - Matching is case-insensitive over raw stored content.
//! - Ordering is deterministic: subject order, then block order.
//! - Blank queries return no hits.

use crate::model::notes::NotesStore;
use crate::model::subject::{BlockNumber, Subject};
use once_cell::sync::Lazy;
use regex::Regex;

const SEARCH_DEFAULT_LIMIT: u32 = 20;
const SNIPPET_MAX_CHARS: usize = 100;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Search options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSearchQuery {
    /// User query text.
    pub text: String,
    /// Optional single-subject filter.
    pub subject: Option<Subject>,
    /// Maximum number of hits to return.
    pub limit: u32,
}

impl NotesSearchQuery {
    /// Creates a query over every subject with the default limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subject: None,
            limit: SEARCH_DEFAULT_LIMIT,
        }
    }
}

/// Single search hit returned by [`search_notes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSearchHit {
    pub subject: Subject,
    pub block: BlockNumber,
    /// Tag-stripped preview of the block content.
    pub snippet: String,
}

/// Searches every stored block for the query text.
pub fn search_notes(store: &NotesStore, query: &NotesSearchQuery) -> Vec<NoteSearchHit> {
    let needle = query.text.trim().to_lowercase();
    if needle.is_empty() || query.limit == 0 {
        return Vec::new();
    }

    store
        .iter()
        .filter(|(subject, _)| query.subject.map_or(true, |only| only == *subject))
        .flat_map(|(subject, notes)| {
            notes
                .iter()
                .map(move |(block, content)| (subject, block, content))
        })
        .filter(|(_, _, content)| content.to_lowercase().contains(&needle))
        .take(query.limit as usize)
        .map(|(subject, block, content)| NoteSearchHit {
            subject,
            block,
            snippet: plain_text_snippet(content),
        })
        .collect()
}

/// Strips HTML tags, collapses whitespace and caps length.
pub fn plain_text_snippet(content: &str) -> String {
    let without_tags = HTML_TAG_RE.replace_all(content, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_tags, " ");
    let trimmed = normalized.trim();
    let mut snippet = trimmed.chars().take(SNIPPET_MAX_CHARS).collect::<String>();
    if trimmed.chars().count() > SNIPPET_MAX_CHARS {
        snippet.push_str("...");
    }
    snippet
}
