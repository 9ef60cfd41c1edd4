pub mod block;
pub mod error;
pub mod inline;

use std::collections::BTreeSet;

pub use error::ParseError;

use crate::Document;
use crate::block::{Block, BlockType};
use crate::interaction::Interaction;
use crate::resolver::{self, Variables};

const LINK_NOTE: &str = "write buttons as `?[%{{name}} A | B]`, or move the link out of `?[...]`";

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source into blocks and the variables they reference.
    pub fn parse(&self) -> Document {
        let (blocks, variables) = parse_document(&self.source);
        Document {
            blocks,
            variables,
            source_id: self.file_id,
        }
    }

    /// Authoring problems in the source. An empty list means every block parsed as written.
    pub fn diagnostics(&self) -> Vec<ParseError> {
        let mut diagnostics = Vec::new();

        for current in block::parse_blocks(&self.source) {
            match current.block_type {
                BlockType::Interaction => {
                    let parsed = inline::parse_interaction_block(&current.content);
                    if let Interaction::Error { message } = parsed.interaction {
                        diagnostics.push(
                            ParseError::error(message, current.span, self.file_id, current.index)
                                .with_note(LINK_NOTE),
                        );
                    }
                }
                BlockType::Content if block::has_interaction_shape(&current.content) => {
                    diagnostics.push(
                        ParseError::warning(
                            "unbalanced brackets in interaction block",
                            current.span,
                            self.file_id,
                            current.index,
                        )
                        .with_note("the block is treated as plain content"),
                    );
                }
                BlockType::Content | BlockType::PreservedContent => {}
            }
        }

        log::debug!("{} diagnostic(s) for file {}", diagnostics.len(), self.file_id);
        diagnostics
    }
}

/// Split `document` into blocks and collect every variable name they reference, sorted and
/// deduplicated.
pub fn parse_document(document: &str) -> (Vec<Block>, Vec<String>) {
    let blocks = block::parse_blocks(document);
    let mut variables = BTreeSet::new();

    for block in &blocks {
        match block.block_type {
            BlockType::Content => {
                variables.extend(inline::parse_content_block(&block.content).variables);
            }
            BlockType::PreservedContent => {
                variables.extend(inline::parse_preserved_content_block(&block.content).variables);
            }
            BlockType::Interaction => {
                variables.extend(inline::parse_interaction_block(&block.content).variables());
            }
        }
    }

    log::debug!(
        "parsed {} block(s) referencing {} variable(s)",
        blocks.len(),
        variables.len()
    );
    (blocks, variables.into_iter().collect())
}

/// Render a block's text with variables resolved.
///
/// Interaction blocks are returned as written; resolving them is up to the runtime that drives
/// the interaction.
pub fn process_block_content(block: &Block, variables: &Variables) -> String {
    let parsed = match block.block_type {
        BlockType::Content => inline::parse_content_block(&block.content),
        BlockType::PreservedContent => inline::parse_preserved_content_block(&block.content),
        BlockType::Interaction => return block.content.clone(),
    };
    resolver::resolve_variables(
        &parsed.processed_content,
        variables,
        Some(&parsed.escape_info),
    )
}
