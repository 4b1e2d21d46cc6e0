//! Board error types.

use kb_core::errors::CoreError;
use kb_store::StoreError;
use thiserror::Error;

/// Errors from board operations.
///
/// Missing targets are not errors: mutations against an unknown ID log a
/// warning and return `Ok(None)` / `Ok(false)`.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Input rejected before any side effect.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The record store failed; the failure has already been logged.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Core error other than validation.
    #[error(transparent)]
    Core(CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CoreError> for BoardError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(message) => Self::Validation(message),
            other => Self::Core(other),
        }
    }
}

impl BoardError {
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
