//! RDL syntax error types.
//!
//! [`SyntaxError`] carries the byte span of the offending input plus a 1-based line/column so
//! messages point at the right place in multi-line report definitions.

use thiserror::Error;

/// A span in the RDL source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from the start of the input.
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a zero-length span at the given position.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

/// RDL syntax error with source position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct SyntaxError {
    /// Error message.
    pub message: String,
    /// Position in the source where the error occurred.
    pub span: Span,
    /// 1-based line of `span.start`.
    pub line: usize,
    /// 1-based column (in characters) of `span.start`.
    pub column: usize,
}

impl SyntaxError {
    /// Creates a new syntax error at `span`, resolving line/column against `input`.
    pub fn new(message: impl Into<String>, span: Span, input: &str) -> Self {
        let (line, column) = line_column(input, span.start);
        Self {
            message: message.into(),
            span,
            line,
            column,
        }
    }

    /// Creates a new error for an unexpected token.
    pub fn unexpected_token(expected: &str, found: &str, span: Span, input: &str) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span, input)
    }

    /// Byte offset where the error starts.
    pub fn offset(&self) -> usize {
        self.span.start
    }
}

fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = input.get(..offset).unwrap_or(input);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
