use dossier_types::{AnswerValue, ConversationMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
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
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub module_index: usize,
    #[serde(default)]
    pub question_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnswerRequest {
    #[serde(default)]
    pub question_label: String,
    pub value: AnswerValue,
}

#[derive(Debug, Deserialize)]
pub struct ValidateModuleRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct InitConversationRequest {
    #[serde(default)]
    pub mode: ConversationMode,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: ConversationMode,
}

/// Body of every operation that only takes a piece of user text.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySuggestionRequest {
    pub suggestion_id: String,
    pub preview_text: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StartChoicesRequest {
    #[serde(default)]
    pub question_label: String,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedContentResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}
