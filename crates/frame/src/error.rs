//! Frame error types
//!
//! Every table-level failure maps onto one of these kinds. Handlers treat
//! them as per-batch errors: log, drop the batch, keep the loop alive.

use thiserror::Error;

use crate::value::TypeTag;

/// Errors raised by column and table operations
#[derive(Debug, Error)]
pub enum FrameError {
    /// A value's tag does not match the column's element type
    #[error("type mismatch on column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        column: String,
        expected: TypeTag,
        found: String,
    },

    /// Two values cannot be compared across type families
    #[error("cannot compare {left} with {right}")]
    Incomparable { left: String, right: String },

    /// Row width does not match the number of columns
    #[error("row has {found} values but table has {expected} columns")]
    Shape { expected: usize, found: usize },

    /// Column does not exist
    #[error("column not found: {0}")]
    NotFound(String),

    /// Index beyond the current size
    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    /// Tables have incompatible schemas
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Operation is not defined for the column's element type
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl FrameError {
    /// Shorthand for a type mismatch on a named column
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: TypeTag,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found: found.into(),
        }
    }
}

/// Result type for frame operations
pub type Result<T> = std::result::Result<T, FrameError>;
