//! Error types for the transcript module.

use thiserror::Error;

/// Errors that can occur in transcript operations.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Underlying file I/O failed.
    #[error("transcript i/o error at {path}: {source}")]
    Io {
        /// Path of the file involved.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line did not match the transcript grammar.
    #[error("unparseable transcript line: {0}")]
    UnparseableLine(String),
}

impl TranscriptError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result alias for transcript operations.
pub type Result<T> = std::result::Result<T, TranscriptError>;
