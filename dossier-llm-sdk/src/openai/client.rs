use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::{
    error::LlmError,
    openai::types::{
        OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIErrorResponse,
        OpenAIMessage, OpenAIResponseFormat,
    },
    types::{CompletionRequest, CompletionResponse, ContentBlock, Usage},
};

/// OpenAI LLM client
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::authentication("API key cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 minute timeout
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: crate::models::openai::GPT_4O_ID.to_string(),
            http_client,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Model reported by [`crate::client::LlmClient::model_name`]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create a chat completion using the OpenAI Chat Completions API
    pub async fn create_chat_completion(
        &self,
        request: OpenAIChatCompletionRequest,
    ) -> Result<OpenAIChatCompletionResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| LlmError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!(url = %url, model = %request.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(LlmError::Network)?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let openai_response: OpenAIChatCompletionResponse = serde_json::from_str(&body)?;
            return Ok(openai_response);
        }

        // Extract retry-after header before consuming the response
        let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
        } else {
            None
        };

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<OpenAIErrorResponse>(&error_text)
            .map(|e| e.error.message)
            .unwrap_or(error_text);

        Err(match status {
            reqwest::StatusCode::BAD_REQUEST => LlmError::invalid_request(message),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                LlmError::authentication(message)
            }
            reqwest::StatusCode::PAYLOAD_TOO_LARGE => LlmError::invalid_request("Request too large"),
            reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::rate_limit(message, retry_after),
            _ => LlmError::status(status.as_u16(), message),
        })
    }
}

#[async_trait]
impl crate::client::LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let messages = request
            .system
            .map(OpenAIMessage::system)
            .into_iter()
            .chain(
                request
                    .messages
                    .iter()
                    .map(|msg| OpenAIMessage::new(msg.role.into(), msg.text_content())),
            )
            .collect();

        let wire_request = OpenAIChatCompletionRequest {
            model: request.model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature,
            response_format: request.response_format.map(OpenAIResponseFormat::from),
        };

        let wire_response = self.create_chat_completion(wire_request).await?;
        let usage = Usage {
            input_tokens: wire_response.usage.prompt_tokens,
            output_tokens: wire_response.usage.completion_tokens,
        };

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::internal("No completion choices returned"))?;

        Ok(CompletionResponse {
            content: vec![ContentBlock::Text {
                text: choice.message.content,
            }],
            role: choice.message.role.into(),
            usage,
            stop_reason: choice.finish_reason,
        })
    }

    fn provider_name(&self) -> &str {
        crate::providers::OPENAI
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
