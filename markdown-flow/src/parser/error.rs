use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// An authoring problem found while linting a document. Parsing itself never fails; these
/// describe blocks that parsed into something the author probably did not intend.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    /// Byte span of the offending block in the source.
    pub span: Range<usize>,
    pub file_id: usize,
    /// Index of the block the problem belongs to.
    pub block_index: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn error(
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
        block_index: usize,
    ) -> Self {
        Self::new(Severity::Error, message, span, file_id, block_index)
    }

    pub fn warning(
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
        block_index: usize,
    ) -> Self {
        Self::new(Severity::Warning, message, span, file_id, block_index)
    }

    fn new(
        severity: Severity,
        message: impl Into<String>,
        span: Range<usize>,
        file_id: usize,
        block_index: usize,
    ) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            block_index,
            severity,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![
                Label::primary(self.file_id, self.span.clone())
                    .with_message(format!("block {}", self.block_index)),
            ])
            .with_notes(self.notes.clone())
    }
}
