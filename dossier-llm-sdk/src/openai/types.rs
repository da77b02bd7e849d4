//! Wire format of `POST /v1/chat/completions`.
//!
//! Only the fields the dossier engine sends or reads are modelled; unknown
//! response fields are ignored so OpenAI-compatible servers (Mistral, vLLM,
//! Ollama) decode the same way.

use serde::{Deserialize, Serialize};

use crate::types::{ResponseFormat, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAIRole {
    System,
    User,
    Assistant,
    /// Only ever received from servers that echo tool turns back.
    Tool,
}

impl From<Role> for OpenAIRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => OpenAIRole::System,
            Role::User => OpenAIRole::User,
            Role::Assistant => OpenAIRole::Assistant,
        }
    }
}

impl From<OpenAIRole> for Role {
    fn from(role: OpenAIRole) -> Self {
        match role {
            OpenAIRole::System => Role::System,
            OpenAIRole::User => Role::User,
            OpenAIRole::Assistant | OpenAIRole::Tool => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: OpenAIRole,
    /// `null` on some refusals, decoded as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl OpenAIMessage {
    pub fn new<S: Into<String>>(role: OpenAIRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Self::new(OpenAIRole::System, content)
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self::new(OpenAIRole::User, content)
    }
}

/// `{"type": "json_object"}` or `{"type": "text"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    pub kind: ResponseFormat,
}

impl From<ResponseFormat> for OpenAIResponseFormat {
    fn from(kind: ResponseFormat) -> Self {
        Self { kind }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatCompletionRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<OpenAIResponseFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatCompletionResponse {
    #[serde(default)]
    pub model: String,
    pub choices: Vec<OpenAIChoice>,
    #[serde(default)]
    pub usage: OpenAIUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChoice {
    pub message: OpenAIMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Body of a non-2xx answer.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorDetail {
    pub message: String,
}
