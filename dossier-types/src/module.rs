use crate::question::{ConditionalBlock, Question};
use serde::{Deserialize, Serialize};

/// Static description of one wizard module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub conditional_blocks: Vec<ConditionalBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

impl ModuleDefinition {
    /// Every question id the module can ever show, conditional ones included.
    pub fn all_question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions
            .iter()
            .chain(self.conditional_blocks.iter().flat_map(|b| b.questions.iter()))
            .map(|q| q.id.as_str())
    }
}
