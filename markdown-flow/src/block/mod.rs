use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A top-level segment of a MarkdownFlow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Trimmed block text. Document-level escapes are already applied; inline escapes are not.
    pub content: String,
    pub block_type: BlockType,
    /// Zero-based position among the document's blocks.
    pub index: usize,
    /// Byte span of the block in the original source, for diagnostics.
    pub span: Range<usize>,
}

impl Block {
    /// First line of the block's content, used for listings.
    pub fn first_line(&self) -> &str {
        self.content.lines().next().unwrap_or_default()
    }
}

/// Block classification. A segment that fits several shapes is an `Interaction` first,
/// then `PreservedContent`, then `Content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Content,
    PreservedContent,
    Interaction,
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockType::Content => "content",
            BlockType::PreservedContent => "preserved_content",
            BlockType::Interaction => "interaction",
        };
        f.pad(name)
    }
}
