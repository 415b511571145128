//! Error type shared by the path model, the parser and the path algebra.

use thiserror::Error;

pub type Result<T, E = PathError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The input string is not a valid path. Nothing was produced.
    #[error("invalid path syntax at byte {offset} ({fragment:?}): {message}")]
    Syntax {
        /// Unparsed remainder of the input starting at the failure position.
        fragment: String,
        /// Byte offset into the original input.
        offset: usize,
        message: String,
    },

    #[error("path has no group elements")]
    EmptyPath,

    #[error("index {index} out of range for path of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("invalid path argument: {0}")]
    Value(String),
}

impl PathError {
    pub fn syntax(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(input.len());
        let fragment = input.get(offset..).unwrap_or_default().to_string();
        Self::Syntax { fragment, offset, message: message.into() }
    }

    pub fn value(message: impl Into<String>) -> Self {
        Self::Value(message.into())
    }

    /// Byte offset of a syntax error, `None` for every other kind.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
