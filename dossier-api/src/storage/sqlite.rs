use crate::DbConnection;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dossier_engine::storage::{ProjectStore, StorageError};
use dossier_types::{
    AssistantConversation, ConversationKey, ConversationMode, ConversationStatus, Project,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::MutexGuard;

pub struct SqliteProjectStore {
    connection: DbConnection,
}

impl SqliteProjectStore {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.connection
            .lock()
            .map_err(|e| StorageError::OperationFailed(format!("Lock error: {}", e)))
    }
}

fn db_error(e: rusqlite::Error) -> StorageError {
    StorageError::OperationFailed(e.to_string())
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::Other(format!("Invalid timestamp {}", millis)))
}

fn mode_str(mode: ConversationMode) -> &'static str {
    match mode {
        ConversationMode::Guided => "guided",
        ConversationMode::Expert => "expert",
    }
}

fn status_str(status: ConversationStatus) -> &'static str {
    match status {
        ConversationStatus::Active => "active",
        ConversationStatus::Completed => "completed",
    }
}

/// Raw column values, decoded outside the rusqlite row closure so JSON
/// errors surface as storage errors.
struct ProjectRow {
    id: String,
    owner_id: String,
    title: String,
    need_type: Option<String>,
    department: Option<String>,
    urgency: Option<String>,
    context: Option<String>,
    objectives: Option<String>,
    constraints: Option<String>,
    wizard_state: Option<String>,
    sections: String,
    version: i64,
    created_at: i64,
    updated_at: i64,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, StorageError> {
        Ok(Project {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            need_type: self.need_type,
            department: self.department,
            urgency: self.urgency,
            context: self.context,
            objectives: self.objectives,
            constraints: self.constraints,
            wizard_state: self
                .wizard_state
                .as_deref()
                .map(serde_json::from_str)
                .transpose()?,
            sections: serde_json::from_str(&self.sections)?,
            version: self.version,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

struct ConversationRow {
    id: String,
    project_id: String,
    module_id: String,
    question_id: String,
    mode: String,
    status: String,
    messages: String,
    generated_text: String,
    created_at: i64,
    updated_at: i64,
    completed_at: Option<i64>,
}

impl ConversationRow {
    fn into_conversation(self) -> Result<AssistantConversation, StorageError> {
        let mode = match self.mode.as_str() {
            "expert" => ConversationMode::Expert,
            _ => ConversationMode::Guided,
        };
        let status = match self.status.as_str() {
            "completed" => ConversationStatus::Completed,
            _ => ConversationStatus::Active,
        };

        Ok(AssistantConversation {
            id: self.id,
            project_id: self.project_id,
            module_id: self.module_id,
            question_id: self.question_id,
            mode,
            status,
            messages: serde_json::from_str(&self.messages)?,
            generated_text: self.generated_text,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
            completed_at: self.completed_at.map(from_millis).transpose()?,
        })
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn create_project(&self, project: Project) -> Result<Project, StorageError> {
        let conn = self.lock()?;

        let wizard_state = project
            .wizard_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let sections = serde_json::to_string(&project.sections)?;

        conn.execute(
            r#"
            INSERT INTO projects
                (id, owner_id, title, need_type, department, urgency, context, objectives,
                 constraints, wizard_state, sections, version, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                project.id,
                project.owner_id,
                project.title,
                project.need_type,
                project.department,
                project.urgency,
                project.context,
                project.objectives,
                project.constraints,
                wizard_state,
                sections,
                project.version,
                project.created_at.timestamp_millis(),
                project.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::Conflict(format!("Project {} already exists", project.id))
            }
            other => db_error(other),
        })?;

        Ok(project)
    }

    async fn get_project(&self, project_id: &str) -> Result<Option<Project>, StorageError> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, owner_id, title, need_type, department, urgency, context,
                       objectives, constraints, wizard_state, sections, version,
                       created_at, updated_at
                FROM projects
                WHERE id = ?1
                "#,
                params![project_id],
                |row| {
                    Ok(ProjectRow {
                        id: row.get(0)?,
                        owner_id: row.get(1)?,
                        title: row.get(2)?,
                        need_type: row.get(3)?,
                        department: row.get(4)?,
                        urgency: row.get(5)?,
                        context: row.get(6)?,
                        objectives: row.get(7)?,
                        constraints: row.get(8)?,
                        wizard_state: row.get(9)?,
                        sections: row.get(10)?,
                        version: row.get(11)?,
                        created_at: row.get(12)?,
                        updated_at: row.get(13)?,
                    })
                },
            )
            .optional()
            .map_err(db_error)?;

        row.map(ProjectRow::into_project).transpose()
    }

    async fn update_project(&self, project: &Project) -> Result<i64, StorageError> {
        let conn = self.lock()?;

        let wizard_state = project
            .wizard_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let sections = serde_json::to_string(&project.sections)?;

        let changed = conn
            .execute(
                r#"
                UPDATE projects
                SET title = ?1, need_type = ?2, department = ?3, urgency = ?4, context = ?5,
                    objectives = ?6, constraints = ?7, wizard_state = ?8, sections = ?9,
                    updated_at = ?10, version = version + 1
                WHERE id = ?11 AND version = ?12
                "#,
                params![
                    project.title,
                    project.need_type,
                    project.department,
                    project.urgency,
                    project.context,
                    project.objectives,
                    project.constraints,
                    wizard_state,
                    sections,
                    project.updated_at.timestamp_millis(),
                    project.id,
                    project.version,
                ],
            )
            .map_err(db_error)?;

        if changed == 1 {
            return Ok(project.version + 1);
        }

        let stored: Option<i64> = conn
            .query_row(
                "SELECT version FROM projects WHERE id = ?1",
                params![project.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;

        match stored {
            Some(version) => Err(StorageError::Conflict(format!(
                "Project {} is at version {}, update was based on {}",
                project.id, version, project.version
            ))),
            None => Err(StorageError::NotFound(format!("Project {}", project.id))),
        }
    }

    async fn get_conversation(
        &self,
        key: &ConversationKey,
    ) -> Result<Option<AssistantConversation>, StorageError> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, project_id, module_id, question_id, mode, status, messages,
                       generated_text, created_at, updated_at, completed_at
                FROM assistant_conversations
                WHERE project_id = ?1 AND module_id = ?2 AND question_id = ?3
                "#,
                params![key.project_id, key.module_id, key.question_id],
                |row| {
                    Ok(ConversationRow {
                        id: row.get(0)?,
                        project_id: row.get(1)?,
                        module_id: row.get(2)?,
                        question_id: row.get(3)?,
                        mode: row.get(4)?,
                        status: row.get(5)?,
                        messages: row.get(6)?,
                        generated_text: row.get(7)?,
                        created_at: row.get(8)?,
                        updated_at: row.get(9)?,
                        completed_at: row.get(10)?,
                    })
                },
            )
            .optional()
            .map_err(db_error)?;

        row.map(ConversationRow::into_conversation).transpose()
    }

    async fn save_conversation(
        &self,
        conversation: &AssistantConversation,
    ) -> Result<(), StorageError> {
        let conn = self.lock()?;
        let messages = serde_json::to_string(&conversation.messages)?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO assistant_conversations
                (id, project_id, module_id, question_id, mode, status, messages,
                 generated_text, created_at, updated_at, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                conversation.id,
                conversation.project_id,
                conversation.module_id,
                conversation.question_id,
                mode_str(conversation.mode),
                status_str(conversation.status),
                messages,
                conversation.generated_text,
                conversation.created_at.timestamp_millis(),
                conversation.updated_at.timestamp_millis(),
                conversation.completed_at.map(|t| t.timestamp_millis()),
            ],
        )
        .map_err(db_error)?;

        Ok(())
    }
}
