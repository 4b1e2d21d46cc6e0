use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to serialize logs: {0}")]
    Serialize(#[from] serde_json::Error),
}
