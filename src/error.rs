//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::vocab::Label;

/// Convenient result type used throughout the crate.
pub type Result<T, E = SeqBucketError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during encoding, bucketing, or IO.
#[derive(Debug, Error)]
pub enum SeqBucketError {
    /// A token was missing from a closed (caller supplied) vocabulary.
    #[error("unknown token {0:?}: vocabulary is closed")]
    UnknownToken(String),
    /// A label has no entry in the vocabulary being used for decoding.
    #[error("unknown label {0}")]
    UnknownLabel(Label),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Array construction failed because the data did not fit the requested shape.
    #[error("array shape error: {0}")]
    Shape(String),
}

impl From<serde_json::Error> for SeqBucketError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SeqBucketError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Shape(err.to_string())
    }
}

impl SeqBucketError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}
