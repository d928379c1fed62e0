//! Decoder error definitions.

use thiserror::Error;

/// An error produced while decoding a `mappings` string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid base64 character {ch:?} at offset {offset}")]
    InvalidBase64 { ch: char, offset: usize },

    #[error("unterminated VLQ value at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("value at offset {offset} does not fit in 64 bits")]
    Overflow { offset: usize },
}

impl DecodeError {
    /// Byte offset into the mappings string where decoding failed.
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::InvalidBase64 { offset, .. } => *offset,
            DecodeError::UnexpectedEnd { offset } => *offset,
            DecodeError::Overflow { offset } => *offset,
        }
    }
}
