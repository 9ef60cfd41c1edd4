use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::{self, EscapeInfo, EscapeType};
use crate::interaction::{self, Interaction};
use crate::parser::block;
use crate::resolver;

/// `%{{name}}`: a variable reserved for the runtime, never substituted here.
static PRESERVED_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\{\{([^}]+)\}\}").expect("preserved variable pattern must compile")
});

/// Inline-parsed text of a content or preserved-content block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Text after inline escapes.
    pub processed_content: String,
    /// Sorted, deduplicated variable names.
    pub variables: Vec<String>,
    /// Escape info for `processed_content`. For preserved content, `original_text` is the body
    /// with the `===` markers removed.
    pub escape_info: EscapeInfo,
}

/// Inline-parsed interaction block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInteraction {
    /// The block content, including `?[` and `]`.
    pub original_content: String,
    pub interaction: Interaction,
    /// Escape info for the inner content.
    pub escape_info: EscapeInfo,
}

impl ParsedInteraction {
    /// The bound variable plus any `{{name}}` referenced in the question, sorted.
    pub fn variables(&self) -> Vec<String> {
        let mut variables: BTreeSet<String> = self
            .interaction
            .variable()
            .map(str::to_string)
            .into_iter()
            .collect();
        if let Some(question) = self.interaction.question() {
            variables.extend(extract_variables(question, None));
        }
        variables.into_iter().collect()
    }
}

/// Inline-parse a plain content block.
pub fn parse_content_block(content: &str) -> ParsedContent {
    parse_text(content)
}

/// Strip the `===` markers, then inline-parse the body.
pub fn parse_preserved_content_block(content: &str) -> ParsedContent {
    parse_text(extract_preserved_content(content))
}

/// Strip `?[` and `]`, inline-escape the inner text and run the interaction grammar on it.
pub fn parse_interaction_block(content: &str) -> ParsedInteraction {
    let inner = content
        .strip_prefix("?[")
        .and_then(|rest| rest.strip_suffix(']'))
        .map_or(content, str::trim);

    let escape_info = escape::process_inline_escapes(inner);
    let interaction = interaction::parse_interaction(&escape_info.processed_text);

    ParsedInteraction {
        original_content: content.to_string(),
        interaction,
        escape_info,
    }
}

/// Variable names referenced in `text`.
///
/// `%{{name}}` is always collected. `{{name}}` is collected unless `escape_info` marks the whole
/// span as fully escaped; without escape info every reference counts.
pub fn extract_variables(text: &str, escape_info: Option<&EscapeInfo>) -> Vec<String> {
    let mut variables: BTreeSet<String> = PRESERVED_VARIABLE
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().trim().to_string())
        .collect();

    let fully_escaped = escape_info.is_some_and(|info| info.escape_type == EscapeType::Full);
    if !fully_escaped {
        variables.extend(
            resolver::references(text).map(|reference| reference.name.trim().to_string()),
        );
    }

    variables.into_iter().collect()
}

/// The body of a preserved-content block; content without markers is returned unchanged.
pub fn extract_preserved_content(content: &str) -> &str {
    if !content.contains('\n') {
        if let Some(body) = block::inline_preserved_body(content) {
            return body.trim();
        }
    }
    block::multiline_preserved_body(content).unwrap_or(content)
}

fn parse_text(text: &str) -> ParsedContent {
    let escape_info = escape::process_inline_escapes(text);
    let variables = extract_variables(&escape_info.processed_text, Some(&escape_info));
    ParsedContent {
        processed_content: escape_info.processed_text.clone(),
        variables,
        escape_info,
    }
}
