//! Parse error types for resource formats.

use thiserror::Error;

/// An error that occurred while parsing a resource.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A syntax error with location information.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// An identifier with more than one attribute segment (`a.b.c`).
    #[error("line {line}: nested attributes are not supported in '{name}'")]
    NestedAttribute { line: usize, name: String },

    /// A hash member was added to a value that is not a `{[ … ]}` index.
    #[error("line {line}: malformed index '{text}'")]
    MalformedIndex { line: usize, text: String },
}

impl ParseError {
    /// Line the error was reported on, 1-based.
    pub fn line(&self) -> usize {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::NestedAttribute { line, .. }
            | ParseError::MalformedIndex { line, .. } => *line,
        }
    }

    /// Column the error was reported on, or 0 when unknown.
    pub fn column(&self) -> usize {
        match self {
            ParseError::Syntax { column, .. } => *column,
            ParseError::NestedAttribute { .. } | ParseError::MalformedIndex { .. } => 0,
        }
    }
}
