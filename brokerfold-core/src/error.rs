//! Error types for statement parsing.

use std::fmt;
use thiserror::Error;

/// Where a line came from: enough to find it again in the source statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    pub account: String,
    pub statement: String,
    pub line: usize,
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: LINE {}", self.account, self.statement, self.line)
    }
}

/// Format violations. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement filename ({filename}) {reason}")]
    FileName {
        filename: String,
        reason: &'static str,
    },

    #[error("{statement}: header spans {count} lines, expected {expected}")]
    HeaderLength {
        statement: String,
        count: usize,
        expected: usize,
    },

    #[error("{at}: {message}")]
    Line { at: LineRef, message: String },

    #[error("{at}: fixup: {message}")]
    Fixup { at: LineRef, message: String },

    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl StatementError {
    pub fn line(at: LineRef, message: impl Into<String>) -> Self {
        StatementError::Line {
            at,
            message: message.into(),
        }
    }

    pub fn fixup(at: LineRef, message: impl Into<String>) -> Self {
        StatementError::Fixup {
            at,
            message: message.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, StatementError>;
