//! Loader error definitions.

use remap_core::{CommentError, MappingError};
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while loading a source file or one of its sources.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Circular source file mapping dependency: {chain}")]
    CircularDependency { chain: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid source map {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid inline source map in {}: {source}", path.display())]
    InlineMap { path: PathBuf, source: CommentError },

    #[error("cannot decode mappings of {}: {source}", path.display())]
    Mapping { path: PathBuf, source: MappingError },
}

impl LoadError {
    /// Whether this error aborts the whole load instead of leaving a gap.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LoadError::CircularDependency { .. })
    }
}
