use crate::storage::{ProjectStore, StorageError};
use dossier_types::{AssistantConversation, ConversationKey, Project};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    projects: Arc<Mutex<HashMap<String, Project>>>,
    conversations: Arc<Mutex<HashMap<ConversationKey, AssistantConversation>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create_project(&self, project: Project) -> Result<Project, StorageError> {
        let mut projects = lock(&self.projects)?;
        if projects.contains_key(&project.id) {
            return Err(StorageError::Conflict(format!(
                "Project {} already exists",
                project.id
            )));
        }
        projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, StorageError> {
        Ok(lock(&self.projects)?.get(project_id).cloned())
    }

    async fn update_project(&self, project: &Project) -> Result<i64, StorageError> {
        let mut projects = lock(&self.projects)?;
        let stored = projects
            .get(&project.id)
            .ok_or_else(|| StorageError::NotFound(format!("Project {}", project.id)))?;

        if stored.version != project.version {
            return Err(StorageError::Conflict(format!(
                "Project {} is at version {}, update was based on {}",
                project.id, stored.version, project.version
            )));
        }

        let mut updated = project.clone();
        updated.version += 1;
        let version = updated.version;
        projects.insert(updated.id.clone(), updated);
        Ok(version)
    }

    async fn get_conversation(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<AssistantConversation>, StorageError> {
        Ok(lock(&self.conversations)?.get(key).cloned())
    }

    async fn save_conversation(
        &self,
        conversation: &AssistantConversation,
    ) -> Result<(), StorageError> {
        lock(&self.conversations)?.insert(conversation.key(), conversation.clone());
        Ok(())
    }
}
