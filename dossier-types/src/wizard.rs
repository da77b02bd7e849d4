use crate::answer::Answer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleState {
    pub status: ModuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
    /// Question ids whose latest answer is meaningful, in first-answered order.
    #[serde(default)]
    pub answered_questions: Vec<String>,
}

/// Per-project wizard bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_module: usize,
    pub current_question: usize,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleState>,
}

impl WizardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_module: 0,
            current_question: 0,
            started_at: now,
            last_activity_at: now,
            modules: BTreeMap::new(),
        }
    }

    pub fn module(&self, module_id: &str) -> Option<&ModuleState> {
        self.modules.get(module_id)
    }

    pub fn module_mut(&mut self, module_id: &str) -> &mut ModuleState {
        self.modules.entry(module_id.to_string()).or_default()
    }
}

/// Document section backing one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Same as the module id.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub generation_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
}

impl Section {
    pub fn new<S: Into<String>>(id: S, title: S) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            answers: Vec::new(),
            generation_count: 0,
            validated_at: None,
        }
    }

    pub fn answer(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}
