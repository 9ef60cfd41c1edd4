pub mod block;
pub mod escape;
pub mod interaction;
pub mod parser;
pub mod resolver;

use crate::block::Block;

pub use crate::escape::{EscapeInfo, EscapeType};
pub use crate::interaction::{Button, Interaction};
pub use crate::parser::{ParseError, Parser, parse_document, process_block_content};
pub use crate::resolver::{UNKNOWN, Variables, resolve_variables};

/// A parsed MarkdownFlow document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Every variable name referenced by any block, sorted and deduplicated.
    pub variables: Vec<String>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Document {
    /// Render block `index` with `variables` resolved. `None` if there is no such block.
    pub fn render_block(&self, index: usize, variables: &Variables) -> Option<String> {
        self.blocks
            .get(index)
            .map(|block| process_block_content(block, variables))
    }
}
