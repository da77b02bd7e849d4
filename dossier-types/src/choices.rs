use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceSource {
    Ai,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidedChoice {
    pub id: String,
    pub label: String,
    pub source: ChoiceSource,
    #[serde(default)]
    pub selected: bool,
}

impl GuidedChoice {
    pub fn new<S: Into<String>>(label: S, source: ChoiceSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into(),
            source,
            selected: false,
        }
    }
}

/// Working set of the choose-then-synthesize flow. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceSession {
    pub id: String,
    pub project_id: String,
    pub module_id: String,
    pub question_id: String,
    pub question_label: String,
    #[serde(default)]
    pub choices: Vec<GuidedChoice>,
    #[serde(default)]
    pub free_text: String,
    #[serde(default)]
    pub generations: u32,
    pub max_generations: u32,
    /// Bumped by the registry on every write-back.
    #[serde(default)]
    pub revision: u64,
}

impl ChoiceSession {
    pub fn new<S: Into<String>>(
        project_id: S,
        module_id: S,
        question_id: S,
        question_label: S,
        max_generations: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.into(),
            module_id: module_id.into(),
            question_id: question_id.into(),
            question_label: question_label.into(),
            choices: Vec::new(),
            free_text: String::new(),
            generations: 0,
            max_generations,
            revision: 0,
        }
    }

    pub fn selected_labels(&self) -> Vec<&str> {
        self.choices
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.label.as_str())
            .collect()
    }

    pub fn can_generate_more(&self) -> bool {
        self.generations < self.max_generations
    }

    pub fn contains_label(&self, label: &str) -> bool {
        let needle = label.trim().to_lowercase();
        self.choices
            .iter()
            .any(|c| c.label.trim().to_lowercase() == needle)
    }
}
