use async_trait::async_trait;
use dossier_types::{AssistantConversation, ConversationKey, Project};

mod memory;

pub use memory::InMemoryProjectStore;

/// Record store the engine reads projects and conversations from.
///
/// Writes are load-modify-store. `update_project` only succeeds when the
/// stored version still equals `project.version`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: Project) -> Result<Project, StorageError>;
    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, StorageError>;
    /// Returns the version now stored.
    async fn update_project(&self, project: &Project) -> Result<i64, StorageError>;

    async fn get_conversation(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<AssistantConversation>, StorageError>;
    /// Upserts by [`ConversationKey`]; a conversation with a different id
    /// for the same key is replaced.
    async fn save_conversation(
        &self,
        conversation: &AssistantConversation,
    ) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError::Other(err.to_string())
    }
}
