//! Error types for building source files.

use thiserror::Error;

/// Failure to turn a raw source map into mappings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("malformed mappings: {0}")]
    Decode(#[from] remap_codec::DecodeError),
}

/// Failure to read an inline `data:` source map comment.
#[derive(Debug, Error)]
pub enum CommentError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("payload is not a source map: {0}")]
    Json(#[from] serde_json::Error),
}
