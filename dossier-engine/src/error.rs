use crate::storage::StorageError;
use dossier_llm_sdk::error::LlmError;

/// Failures surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The completion capability is not configured.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The project changed since it was loaded.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The completion capability replied with something unusable.
    #[error("Internal failure: {0}")]
    InternalFailure(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(message) => EngineError::NotFound(message),
            StorageError::Conflict(message) => EngineError::Conflict(message),
            other => EngineError::Storage(other),
        }
    }
}
