//! Error types for RMP protocol parsing

use thiserror::Error;

/// Errors that can occur while parsing a panel line
///
/// Neither variant is fatal: the offending line is discarded and the link
/// keeps running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line has a known prefix but its payload does not parse
    #[error("invalid input ->{line}<-: {reason}")]
    Malformed { line: String, reason: &'static str },

    /// Line does not match any known message
    #[error("invalid msg ->{0}<- discarded")]
    Unrecognized(String),
}

impl ParseError {
    /// The raw line that failed to parse
    pub fn line(&self) -> &str {
        match self {
            ParseError::Malformed { line, .. } => line,
            ParseError::Unrecognized(line) => line,
        }
    }

    /// Consume the error, returning the raw line
    pub fn into_line(self) -> String {
        match self {
            ParseError::Malformed { line, .. } => line,
            ParseError::Unrecognized(line) => line,
        }
    }
}
