use std::iter;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockType};
use crate::escape;

/// A line holding only `---`. Surrounding whitespace, blank lines included, is absorbed.
static BLOCK_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*---\s*\n").expect("block separator pattern must compile")
});

/// `===body===` on a single line.
static INLINE_PRESERVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^===(.+)===$").expect("preserved content pattern must compile")
});

const PRESERVE_FENCE: &str = "===";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split a document into classified, contiguously indexed blocks.
///
/// Document-level escapes are applied to the whole text first, so `\---` splits like `---` and
/// `\===` / `\?[` mark blocks like their unescaped forms. Spans still index the original source.
/// Blank segments are dropped and never consume an index.
pub fn parse_blocks(document: &str) -> Vec<Block> {
    let escaped = escape::escape_document(document);
    let text = escaped.text.as_str();
    let separators = BLOCK_SEPARATOR
        .find_iter(text)
        .map(|m| m.range())
        .chain(iter::once(text.len()..text.len()));

    let mut blocks = Vec::new();
    let mut segment_start = 0;
    for separator in separators {
        let segment = segment_start..separator.start;
        segment_start = separator.end;

        let Some((content, range)) = trim_segment(text, segment) else {
            continue;
        };
        let block_type = classify(content);
        let span = escaped.source_offset(range.start)..escaped.source_offset(range.end);
        log::trace!("block {}: {} at {:?}", blocks.len(), block_type, span);
        blocks.push(Block {
            content: content.to_string(),
            block_type,
            index: blocks.len(),
            span,
        });
    }

    log::debug!("segmented document into {} block(s)", blocks.len());
    blocks
}

/// Decide a segment's type. `content` must already be trimmed.
pub fn classify(content: &str) -> BlockType {
    if is_interaction_block(content) {
        BlockType::Interaction
    } else if is_preserved_content_block(content) {
        BlockType::PreservedContent
    } else {
        BlockType::Content
    }
}

/// `?[ ... ]` with balanced square brackets across the whole span.
pub fn is_interaction_block(content: &str) -> bool {
    has_interaction_shape(content) && brackets_balanced(content)
}

/// `===body===` with no `=` in the body, or `===` / lines / `===` over three or more lines.
pub fn is_preserved_content_block(content: &str) -> bool {
    let lines: Vec<&str> = content.split('\n').collect();

    if let [line] = lines.as_slice() {
        if inline_preserved_body(line).is_some_and(|body| !body.contains('=')) {
            return true;
        }
    }

    multiline_preserved_body(content).is_some()
}

// ---------------------------------------------------------------------------
// Helpers shared with the inline parser and diagnostics
// ---------------------------------------------------------------------------

/// Starts with `?[` and ends with `]`, whether or not the brackets balance.
pub(crate) fn has_interaction_shape(content: &str) -> bool {
    let content = content.trim();
    content.starts_with("?[") && content.ends_with(']')
}

fn brackets_balanced(content: &str) -> bool {
    let depth = content.chars().fold(0i64, |depth, c| match c {
        '[' => depth + 1,
        ']' => depth - 1,
        _ => depth,
    });
    depth == 0
}

/// Body of a single-line `===body===`, untrimmed.
pub(crate) fn inline_preserved_body(line: &str) -> Option<&str> {
    INLINE_PRESERVED
        .captures(line.trim())
        .and_then(|captures| captures.get(1))
        .map(|body| body.as_str())
}

/// Lines between a leading and a trailing `===` line, newline-joined.
pub(crate) fn multiline_preserved_body(content: &str) -> Option<&str> {
    let first_break = content.find('\n')?;
    let last_break = content.rfind('\n')?;
    if first_break == last_break {
        return None;
    }

    let first_line = &content[..first_break];
    let last_line = &content[last_break + 1..];
    if first_line.trim() == PRESERVE_FENCE && last_line.trim() == PRESERVE_FENCE {
        Some(&content[first_break + 1..last_break])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Segment bookkeeping
// ---------------------------------------------------------------------------

/// Trim a segment of `text`, returning the content and its range. `None` for blank segments.
fn trim_segment(text: &str, segment: Range<usize>) -> Option<(&str, Range<usize>)> {
    let raw = &text[segment.clone()];
    let content = raw.trim();
    if content.is_empty() {
        return None;
    }
    let start = segment.start + (raw.len() - raw.trim_start().len());
    Some((content, start..start + content.len()))
}
