use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
/// How escape sequences affect variable substitution in a processed span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeType {
    /// No escape sequences were found.
    None,
    /// Every `{{name}}` marker in the span is literal text.
    Full,
    /// Only the `{{name}}` markers listed in `variable_positions` are live.
    Partial,
}

/// Result of running one escape vocabulary over a piece of text.
///
/// `variable_positions` index into `processed_text` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeInfo {
    pub escape_type: EscapeType,
    pub original_text: String,
    pub processed_text: String,
    /// Byte ranges of `{{name}}` markers that stay substitutable. Empty unless `Partial`.
    pub variable_positions: Vec<Range<usize>>,
}

/// A single replacement: `before` in the pass input became `after` in the pass output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    before: Range<usize>,
    after: Range<usize>,
}

impl EscapeInfo {
    /// Info for text that contains no escape sequences.
    pub fn unescaped(text: impl Into<String>) -> Self {
        let text = text.into();
        EscapeInfo {
            escape_type: EscapeType::None,
            processed_text: text.clone(),
            original_text: text,
            variable_positions: Vec::new(),
        }
    }

    /// Whether a `{{name}}` marker starting at `offset` in `processed_text` may be substituted.
    pub fn is_substitutable(&self, offset: usize) -> bool {
        match self.escape_type {
            EscapeType::None => true,
            EscapeType::Full => false,
            EscapeType::Partial => self
                .variable_positions
                .iter()
                .any(|range| range.contains(&offset)),
        }
    }
}

// ---------------------------------------------------------------------------
// Escape vocabularies
// ---------------------------------------------------------------------------

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("escape pattern must compile")
}

static ESCAPED_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\---"));
static ESCAPED_PRESERVE_FENCE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\==="));
static ESCAPED_INTERACTION_OPEN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\\?\["));

static ESCAPED_ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\\.\.\."));
static ESCAPED_PIPE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\\|"));
static ESCAPED_VALUE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\//"));
static ESCAPED_VARIABLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\\\{\{[^}]+\}\}"));

/// `\%{{name}}`: the backslash escapes the `%` only.
static PARTIALLY_ESCAPED_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\\%\{\{[^}]+\}\}"));

static DOCUMENT_ESCAPES: [&LazyLock<Regex>; 3] = [
    &ESCAPED_SEPARATOR,
    &ESCAPED_PRESERVE_FENCE,
    &ESCAPED_INTERACTION_OPEN,
];

static INLINE_ESCAPES: [&LazyLock<Regex>; 4] = [
    &ESCAPED_ELLIPSIS,
    &ESCAPED_PIPE,
    &ESCAPED_VALUE_SEPARATOR,
    &ESCAPED_VARIABLE,
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Apply the document-level escapes (`\---`, `\===`, `\?[`).
///
/// Applied to the whole document before it is split, so an escaped marker is structural.
pub fn process_document_escapes(text: &str) -> EscapeInfo {
    process(text, &DOCUMENT_ESCAPES, false).0
}

/// Document text after the document-level escapes, able to map offsets back to the source.
#[derive(Debug, Clone)]
pub(crate) struct EscapedDocument {
    pub text: String,
    passes: Vec<Vec<Edit>>,
}

impl EscapedDocument {
    /// The source offset that `offset` in the escaped text came from.
    pub fn source_offset(&self, offset: usize) -> usize {
        self.passes
            .iter()
            .rev()
            .fold(offset, |offset, edits| unmap_offset(edits, offset))
    }
}

pub(crate) fn escape_document(text: &str) -> EscapedDocument {
    let (info, passes) = process(text, &DOCUMENT_ESCAPES, false);
    EscapedDocument {
        text: info.processed_text,
        passes,
    }
}

/// Apply the inline escapes (`\...`, `\|`, `\//`, `\{{name}}`) and the partial escape
/// `\%{{name}}` to the content of a single block.
pub fn process_inline_escapes(text: &str) -> EscapeInfo {
    process(text, &INLINE_ESCAPES, true).0
}

/// Run the escape passes over `text`. Also returns the edits of every pass that changed the text,
/// in order.
fn process(
    text: &str,
    full_escapes: &[&LazyLock<Regex>],
    with_partial: bool,
) -> (EscapeInfo, Vec<Vec<Edit>>) {
    // Every escape starts with a backslash.
    if !text.contains('\\') {
        return (EscapeInfo::unescaped(text), Vec::new());
    }

    let mut processed = text.to_string();
    let mut passes = Vec::new();
    let mut escape_type = EscapeType::None;
    let mut variable_positions: Vec<Range<usize>> = Vec::new();

    if with_partial {
        if let Some((rewritten, edits)) = strip_backslashes(&processed, &PARTIALLY_ESCAPED_VARIABLE)
        {
            escape_type = EscapeType::Partial;
            // `%{{name}}`: the marker starts right after the `%`.
            variable_positions = edits
                .iter()
                .map(|edit| edit.after.start + 1..edit.after.end)
                .collect();
            processed = rewritten;
            passes.push(edits);
        }
    }

    for escape in full_escapes {
        if let Some((rewritten, edits)) = strip_backslashes(&processed, escape) {
            if escape_type == EscapeType::None {
                escape_type = EscapeType::Full;
            }
            for position in &mut variable_positions {
                *position = map_offset(&edits, position.start)..map_offset(&edits, position.end);
            }
            processed = rewritten;
            passes.push(edits);
        }
    }

    log::trace!(
        "escape pass: {:?}, {} live variable position(s)",
        escape_type,
        variable_positions.len()
    );

    let info = EscapeInfo {
        escape_type,
        original_text: text.to_string(),
        processed_text: processed,
        variable_positions,
    };
    (info, passes)
}

/// Rewrite every match of `escape` by dropping its leading backslash.
///
/// All matches are collected against the input snapshot and the output is rebuilt forward.
/// Returns `None` when nothing matched.
fn strip_backslashes(text: &str, escape: &Regex) -> Option<(String, Vec<Edit>)> {
    let mut output = String::with_capacity(text.len());
    let mut edits = Vec::new();
    let mut last = 0;

    for found in escape.find_iter(text) {
        output.push_str(&text[last..found.start()]);
        let start = output.len();
        output.push_str(&found.as_str()[1..]);
        edits.push(Edit {
            before: found.range(),
            after: start..output.len(),
        });
        last = found.end();
    }

    if edits.is_empty() {
        return None;
    }
    output.push_str(&text[last..]);
    Some((output, edits))
}

/// Carry an offset in a pass's input over to its output. Offsets inside an edited span are
/// aligned to its end, since every escape removes a prefix.
fn map_offset(edits: &[Edit], offset: usize) -> usize {
    let mut mapped = offset;
    for Edit { before, after } in edits {
        if offset >= before.end {
            mapped = after.end + (offset - before.end);
        } else if offset > before.start {
            return after.end.saturating_sub(before.end - offset).max(after.start);
        } else {
            break;
        }
    }
    mapped
}

/// Carry an offset in a pass's output back to its input. An offset inside an edited span maps to
/// the same character before the removed prefix was dropped; the span's start maps to the start of
/// the original match.
fn unmap_offset(edits: &[Edit], offset: usize) -> usize {
    let mut mapped = offset;
    for Edit { before, after } in edits {
        if offset >= after.end {
            mapped = before.end + (offset - after.end);
        } else if offset > after.start {
            return before.end - (after.end - offset);
        } else {
            break;
        }
    }
    mapped
}
