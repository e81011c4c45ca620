//! Codec error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding or encoding delimited text
#[derive(Debug, Error)]
pub enum CodecError {
    /// Reading or writing the underlying file failed
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row cannot be parsed under the fixed column types
    #[error("bad row at line {line}: {reason}")]
    BadRow { line: usize, reason: String },

    /// The input has no header line
    #[error("missing header line")]
    MissingHeader,

    /// A table-level failure while building or serializing
    #[error(transparent)]
    Frame(#[from] cartflow_frame::FrameError),
}

impl CodecError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn bad_row(line: usize, reason: impl Into<String>) -> Self {
        Self::BadRow {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
