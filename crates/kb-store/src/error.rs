//! Record store error types.

use std::path::PathBuf;

use kb_core::errors::CoreError;
use thiserror::Error;

/// Errors from record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a collection document failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection document could not be (de)serialized.
    #[error("Serialization error in collection '{collection}': {source}")]
    Serde {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid state encountered (e.g., a counter that is not a number).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Core error raised while building seed data.
    #[error(transparent)]
    Core(#[from] CoreError),
}
