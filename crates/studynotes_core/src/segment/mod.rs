//! Segmentation of generated curriculum text into subject blocks.
//!
//! # Responsibility
//! - Split one generated text into exactly six blocks for full-curriculum
//!   imports, falling back through progressively looser strategies.
//! - Wrap single-block output without touching it.
//!
//! # Invariants
//! - Full-curriculum results always hold keys `1..=6`.
//! - Segmentation never fails; empty input yields six empty blocks.
//! - Each strategy is a pure function over `&str`.
//!
//! # Strategies
//! 1. [`split_by_block_markers`]: `Block N:` level-2 headings, keyed by `N`.
//! 2. [`split_by_headings`]: every level-2 heading, keyed by position.
//! 3. [`split_even_chunks`]: paragraphs spread over six groups.

use crate::model::subject::{BlockNumber, BLOCKS_PER_SUBJECT};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static BLOCK_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)(?:^##[ \t]*|<h2\b[^>]*>[ \t]*)Block[ \t]+(\d{1,3})[ \t]*[:.\-–—]")
        .expect("valid block marker regex")
});
static HEADING_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^##[ \t]|<h2\b").expect("valid heading regex"));
static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("valid paragraph regex"));

/// Which strategy produced a [`Segmentation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationStrategy {
    BlockMarkers,
    Headings,
    EvenChunks,
    /// Single-block mode; text stored as-is.
    SingleBlock,
}

impl SegmentationStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockMarkers => "block_markers",
            Self::Headings => "headings",
            Self::EvenChunks => "even_chunks",
            Self::SingleBlock => "single_block",
        }
    }
}

/// Block contents produced from one generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub strategy: SegmentationStrategy,
    pub blocks: BTreeMap<BlockNumber, String>,
}

/// Splits a full-curriculum text into exactly six blocks.
pub fn segment_full_curriculum(text: &str) -> Segmentation {
    let by_markers = split_by_block_markers(text);
    let marker_blocks = by_markers.len();
    let segmentation = if by_markers.len() == usize::from(BLOCKS_PER_SUBJECT) {
        Segmentation {
            strategy: SegmentationStrategy::BlockMarkers,
            blocks: by_markers,
        }
    } else if let Some(blocks) = split_by_headings(text) {
        Segmentation {
            strategy: SegmentationStrategy::Headings,
            blocks,
        }
    } else {
        if text.trim().is_empty() {
            warn!("event=segment module=segment status=underflow reason=empty_input");
        }
        Segmentation {
            strategy: SegmentationStrategy::EvenChunks,
            blocks: split_even_chunks(text),
        }
    };

    debug!(
        "event=segment module=segment status=ok strategy={} marker_blocks={} input_bytes={}",
        segmentation.strategy.as_str(),
        marker_blocks,
        text.len()
    );
    segmentation
}

/// Wraps single-block output: `{block: text}` with no splitting.
pub fn segment_single_block(block: BlockNumber, text: &str) -> Segmentation {
    Segmentation {
        strategy: SegmentationStrategy::SingleBlock,
        blocks: BTreeMap::from([(block, text.to_string())]),
    }
}

/// Strategy 1: splits on `Block N:` level-2 headings.
///
/// Accepts Markdown (`## Block 2: Title` at line start) and HTML
/// (`<h2>Block 2 - Title`) forms. Each block runs from its marker to the
/// next marker or end of text, markers included. Keys come from the marker
/// number; markers outside `1..=6` are not boundaries, and a repeated
/// number keeps the later block. Text before the first marker is dropped.
///
/// The result may hold fewer than six blocks.
pub fn split_by_block_markers(text: &str) -> BTreeMap<BlockNumber, String> {
    let markers = BLOCK_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let block = BlockNumber::parse(caps.get(1)?.as_str()).ok()?;
            Some((start, block))
        })
        .collect::<Vec<_>>();

    let mut blocks = BTreeMap::new();
    for (index, (start, block)) in markers.iter().enumerate() {
        let end = markers
            .get(index + 1)
            .map_or(text.len(), |(next_start, _)| *next_start);
        blocks.insert(*block, text[*start..end].to_string());
    }
    blocks
}

/// Strategy 2: splits at every level-2 heading, numbering by position.
///
/// Non-blank text before the first heading is kept at the front of block 1.
/// Segments past the sixth are appended to block 6; with fewer than six
/// headings the trailing blocks are empty. Returns `None` only when the text
/// has no heading at all.
pub fn split_by_headings(text: &str) -> Option<BTreeMap<BlockNumber, String>> {
    let starts = HEADING_OPEN_RE
        .find_iter(text)
        .map(|found| found.start())
        .collect::<Vec<_>>();
    if starts.is_empty() {
        return None;
    }
    let block_count = usize::from(BLOCKS_PER_SUBJECT);

    let mut segments = starts
        .iter()
        .enumerate()
        .map(|(index, start)| {
            let end = starts.get(index + 1).copied().unwrap_or(text.len());
            text[*start..end].to_string()
        })
        .collect::<Vec<_>>();

    let preamble = &text[..starts[0]];
    if !preamble.trim().is_empty() {
        segments[0].insert_str(0, preamble);
    }

    if segments.len() > block_count {
        let overflow = segments.split_off(block_count).concat();
        segments[block_count - 1].push_str(&overflow);
    }
    segments.resize(block_count, String::new());

    Some(BlockNumber::all().zip(segments).collect())
}

/// Strategy 3: spreads paragraphs over six contiguous groups.
///
/// Paragraphs are separated by blank lines and trimmed. Each group takes
/// `ceil(paragraphs / 6)` paragraphs, so trailing groups may be short or
/// empty. Non-empty groups get a synthesized `<h2>Block N</h2>` heading;
/// empty groups are empty strings.
pub fn split_even_chunks(text: &str) -> BTreeMap<BlockNumber, String> {
    let paragraphs = PARAGRAPH_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>();
    let block_count = usize::from(BLOCKS_PER_SUBJECT);
    let group_size = paragraphs.len().div_ceil(block_count).max(1);

    BlockNumber::all()
        .enumerate()
        .map(|(index, block)| {
            let start = (index * group_size).min(paragraphs.len());
            let end = (start + group_size).min(paragraphs.len());
            let group = &paragraphs[start..end];
            let content = if group.is_empty() {
                String::new()
            } else {
                format!("<h2>Block {block}</h2>\n{}", group.join("\n\n"))
            };
            (block, content)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        segment_full_curriculum, segment_single_block, split_by_block_markers,
        split_by_headings, split_even_chunks, SegmentationStrategy,
    };
    use crate::model::subject::BlockNumber;

    fn block(value: i64) -> BlockNumber {
        BlockNumber::new(value).unwrap()
    }

    fn six_marker_text() -> (String, Vec<String>) {
        let parts = (1..=6)
            .map(|n| format!("<h2>Block {n}: Topic {n}</h2>\n<p>body {n}</p>\n<hr>\n"))
            .collect::<Vec<_>>();
        (format!("Intro line\n{}", parts.concat()), parts)
    }

    #[test]
    fn markers_split_byte_for_byte() {
        let (text, parts) = six_marker_text();
        let segmentation = segment_full_curriculum(&text);
        assert_eq!(segmentation.strategy, SegmentationStrategy::BlockMarkers);
        for (index, part) in parts.iter().enumerate() {
            assert_eq!(&segmentation.blocks[&block(index as i64 + 1)], part);
        }
    }

    #[test]
    fn markdown_markers_are_keyed_by_number_not_position() {
        let text = "## Block 2: B\nb\n## Block 1: A\na\n";
        let blocks = split_by_block_markers(text);
        assert_eq!(blocks[&block(1)], "## Block 1: A\na\n");
        assert_eq!(blocks[&block(2)], "## Block 2: B\nb\n");
    }

    #[test]
    fn duplicate_marker_keeps_the_later_block() {
        let text = "## Block 1: first\nx\n## Block 1: second\ny\n";
        let blocks = split_by_block_markers(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[&block(1)], "## Block 1: second\ny\n");
    }

    #[test]
    fn out_of_range_marker_is_not_a_boundary() {
        let text = "## Block 1: a\none\n## Block 7: b\nseven\n";
        let blocks = split_by_block_markers(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[&block(1)], text);
    }

    #[test]
    fn headings_fallback_numbers_by_position_and_keeps_overflow() {
        let text = "lead\n<h2>a</h2>\n<h2>b</h2>\n<h2>c</h2>\n<h2>d</h2>\n<h2>e</h2>\n<h2>f</h2>\n<h2>g</h2>\n";
        let segmentation = segment_full_curriculum(text);
        assert_eq!(segmentation.strategy, SegmentationStrategy::Headings);
        assert_eq!(segmentation.blocks[&block(1)], "lead\n<h2>a</h2>\n");
        assert_eq!(segmentation.blocks[&block(2)], "<h2>b</h2>\n");
        assert_eq!(segmentation.blocks[&block(6)], "<h2>f</h2>\n<h2>g</h2>\n");
    }

    #[test]
    fn headings_fallback_requires_at_least_one_heading() {
        assert!(split_by_headings("no headings\n\nhere").is_none());
        let blocks = split_by_headings("## one\n## two\n").unwrap();
        assert_eq!(blocks[&block(1)], "## one\n");
        assert_eq!(blocks[&block(2)], "## two\n");
        assert!(blocks[&block(3)].is_empty());
    }

    #[test]
    fn five_block_markers_keep_their_structure() {
        let parts = (1..=5)
            .map(|n| format!("<h2>Block {n}: T{n}</h2><p>b{n}</p><hr>"))
            .collect::<Vec<_>>();
        let segmentation = segment_full_curriculum(&parts.concat());

        assert_eq!(segmentation.strategy, SegmentationStrategy::Headings);
        for (index, part) in parts.iter().enumerate() {
            assert_eq!(&segmentation.blocks[&block(index as i64 + 1)], part);
        }
        assert!(segmentation.blocks[&block(6)].is_empty());
    }

    #[test]
    fn even_chunks_preserve_paragraph_order() {
        let paragraphs = (1..=8).map(|n| format!("para {n}")).collect::<Vec<_>>();
        let text = paragraphs.join("\n\n");
        let segmentation = segment_full_curriculum(&text);
        assert_eq!(segmentation.strategy, SegmentationStrategy::EvenChunks);

        let rebuilt = segmentation
            .blocks
            .iter()
            .filter(|(_, content)| !content.is_empty())
            .flat_map(|(number, content)| {
                let heading = format!("<h2>Block {number}</h2>\n");
                content
                    .strip_prefix(heading.as_str())
                    .expect("synthesized heading")
                    .split("\n\n")
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        assert_eq!(rebuilt, paragraphs);
        // ceil(8 / 6) = 2 per group: 2, 2, 2, 2, 0, 0.
        assert!(segmentation.blocks[&block(5)].is_empty());
        assert!(segmentation.blocks[&block(6)].is_empty());
    }

    #[test]
    fn empty_input_yields_six_empty_blocks() {
        for text in ["", "   \n\n  "] {
            let segmentation = segment_full_curriculum(text);
            assert_eq!(segmentation.blocks.len(), 6);
            assert!(segmentation.blocks.values().all(String::is_empty));
        }
    }

    #[test]
    fn every_full_result_has_six_keys() {
        let inputs = [
            "plain sentence",
            "## Block 3: only one\ntext",
            "<h2>one</h2><h2>two</h2>",
            "a\n\nb\n\nc\n\nd\n\ne\n\nf\n\ng",
        ];
        for text in inputs {
            let keys = segment_full_curriculum(text)
                .blocks
                .keys()
                .map(|block| block.get())
                .collect::<Vec<_>>();
            assert_eq!(keys, vec![1, 2, 3, 4, 5, 6], "input: {text:?}");
        }
    }

    #[test]
    fn even_chunks_with_few_paragraphs_fill_leading_blocks() {
        let blocks = split_even_chunks("only\n\ntwo");
        assert_eq!(blocks[&block(1)], "<h2>Block 1</h2>\nonly");
        assert_eq!(blocks[&block(2)], "<h2>Block 2</h2>\ntwo");
        assert!(blocks[&block(3)].is_empty());
    }

    #[test]
    fn single_block_is_stored_verbatim() {
        let segmentation = segment_single_block(block(4), "<h2>Block 1: x</h2>");
        assert_eq!(segmentation.strategy, SegmentationStrategy::SingleBlock);
        assert_eq!(segmentation.blocks.len(), 1);
        assert_eq!(segmentation.blocks[&block(4)], "<h2>Block 1: x</h2>");
    }
}
