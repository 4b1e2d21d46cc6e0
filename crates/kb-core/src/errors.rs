//! Cross-cutting error types for the board.
//!
//! Domain-specific errors (`StoreError`, `NotifyError`, `BoardError`) are defined
//! in their respective crates. Everything converges into `anyhow` in `kb-cli`.

use thiserror::Error;

/// Errors that can be raised by any board crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (required field, role/sector combination, format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
