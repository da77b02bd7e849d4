use crate::wizard::{Section, WizardState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single-field project columns that predate per-module sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyField {
    Context,
    Objectives,
    Constraints,
}

impl LegacyField {
    /// Legacy column mirrored by a module, if any.
    pub fn for_module(module_id: &str) -> Option<Self> {
        match module_id {
            "contexte" => Some(LegacyField::Context),
            "objectifs" => Some(LegacyField::Objectives),
            "contraintes" => Some(LegacyField::Constraints),
            _ => None,
        }
    }
}

/// A demand dossier as handed over by the project store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub need_type: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub objectives: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub wizard_state: Option<WizardState>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new<S: Into<String>>(owner_id: S, title: S) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            need_type: None,
            department: None,
            urgency: None,
            context: None,
            objectives: None,
            constraints: None,
            wizard_state: None,
            sections: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn section(&self, module_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == module_id)
    }

    pub fn section_mut(&mut self, module_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == module_id)
    }

    pub fn legacy_field(&self, field: LegacyField) -> Option<&str> {
        match field {
            LegacyField::Context => self.context.as_deref(),
            LegacyField::Objectives => self.objectives.as_deref(),
            LegacyField::Constraints => self.constraints.as_deref(),
        }
    }

    pub fn set_legacy_field(&mut self, field: LegacyField, value: String) {
        match field {
            LegacyField::Context => self.context = Some(value),
            LegacyField::Objectives => self.objectives = Some(value),
            LegacyField::Constraints => self.constraints = Some(value),
        }
    }
}
