//! Trigger error types

use thiserror::Error;

use crate::TriggerState;

/// Errors raised by trigger lifecycle transitions
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The requested transition is not legal from the current state
    #[error("invalid trigger state: expected {expected:?}, was {actual:?}")]
    InvalidState {
        expected: TriggerState,
        actual: TriggerState,
    },
}
