use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No matching records. Callers treat this as an empty result, not a failure.
    #[error("No matching records")]
    NotFound,

    #[error("Service responded with status {0}")]
    Status(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Stats task failed: {0}")]
    Task(String),

    #[error("Invalid game record: {0}")]
    InvalidRecord(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound)
    }
}
