//! Access to the completion capability with the engine's failure rules.

use crate::config::LlmSettings;
use crate::error::EngineError;
use dossier_llm_sdk::client::LlmClient;
use dossier_llm_sdk::error::LlmError;
use dossier_llm_sdk::openai::OpenAIClient;
use dossier_llm_sdk::providers;
use dossier_llm_sdk::types::{CompletionRequest, Message, ResponseFormat};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Sampling settings shared by every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: dossier_llm_sdk::models::openai::GPT_4O_MINI_ID.to_string(),
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

#[derive(Clone)]
pub struct Generator {
    client: Option<Arc<dyn LlmClient>>,
    config: GenerationConfig,
}

impl Generator {
    pub fn new(client: Option<Arc<dyn LlmClient>>, config: GenerationConfig) -> Self {
        Self { client, config }
    }

    pub fn unconfigured() -> Self {
        Self::new(None, GenerationConfig::default())
    }

    /// Builds the client described by `settings`. Without an API key the
    /// generator stays unconfigured.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let config = settings.generation_config();
        let Some(api_key) = settings.resolved_api_key() else {
            tracing::warn!("No LLM API key configured, text generation is disabled");
            return Ok(Self::new(None, config));
        };

        let client = match settings.provider.as_str() {
            providers::OPENAI | providers::OPENAI_COMPATIBLE => {
                let mut client = OpenAIClient::new(api_key)?.with_model(settings.model.as_str());
                if let Some(base_url) = &settings.base_url {
                    client = client.with_base_url(base_url.as_str());
                }
                client
            }
            other => {
                return Err(LlmError::invalid_request(format!(
                    "Unsupported LLM provider '{}'",
                    other
                )))
            }
        };

        tracing::info!(provider = %settings.provider, model = %settings.model, "LLM client configured");
        Ok(Self::new(Some(Arc::new(client)), config))
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Fails with `PreconditionFailed` when no client is configured. Callers
    /// check this before touching any state.
    pub fn require(&self) -> Result<&Arc<dyn LlmClient>, EngineError> {
        self.client.as_ref().ok_or_else(|| {
            EngineError::PreconditionFailed("Text generation is not configured".to_string())
        })
    }

    fn request(&self, system: Option<&str>, messages: Vec<Message>) -> CompletionRequest {
        let mut request = CompletionRequest::new(self.config.model.as_str(), messages)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);
        if let Some(system) = system {
            request = request.with_system(system);
        }
        request
    }

    /// Free-text completion, returned verbatim.
    pub async fn complete_text(
        &self,
        system: Option<&str>,
        messages: Vec<Message>,
    ) -> Result<String, EngineError> {
        let client = self.require()?;
        let response = client.complete(self.request(system, messages)).await?;
        let text = response.text();
        tracing::debug!(
            provider = client.provider_name(),
            output_tokens = response.usage.output_tokens,
            "Text completion received"
        );
        Ok(text)
    }

    /// Completion in JSON mode, parsed into `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        messages: Vec<Message>,
    ) -> Result<T, EngineError> {
        let client = self.require()?;
        let request = self
            .request(Some(system), messages)
            .with_response_format(ResponseFormat::JsonObject);
        let response = client.complete(request).await?;
        let raw = response.text();
        tracing::debug!(provider = client.provider_name(), reply = %raw, "JSON completion received");
        parse_json_reply(&raw)
    }
}

/// Strips a surrounding Markdown code fence, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T, EngineError> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        tracing::warn!(error = %e, "Unparsable reply from text generation");
        EngineError::InternalFailure(format!("Unexpected reply from text generation: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        text: String,
    }

    #[test]
    fn test_parse_plain_json() {
        let reply: Reply = parse_json_reply(r#"{"text":"ok"}"#).unwrap();
        assert_eq!(reply.text, "ok");
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply: Reply = parse_json_reply("```json\n{\"text\":\"ok\"}\n```").unwrap();
        assert_eq!(reply.text, "ok");

        let reply: Reply = parse_json_reply("```\n{\"text\":\"ok\"}\n```").unwrap();
        assert_eq!(reply.text, "ok");
    }

    #[test]
    fn test_parse_failure_is_internal_failure() {
        let result: Result<Reply, _> = parse_json_reply("Voici le texte demandé");
        assert!(matches!(result, Err(EngineError::InternalFailure(_))));
    }

    #[test]
    fn test_settings_without_key_leave_generator_unconfigured() {
        let settings = LlmSettings {
            api_key: Some("  ".to_string()),
            ..LlmSettings::default()
        };
        if std::env::var("OPENAI_API_KEY").is_err() {
            let generator = Generator::from_settings(&settings).unwrap();
            assert!(!generator.is_configured());
        }

        let settings = LlmSettings {
            provider: "carrier-pigeon".to_string(),
            api_key: Some("sk-test".to_string()),
            ..LlmSettings::default()
        };
        assert!(Generator::from_settings(&settings).is_err());
    }

    #[test]
    fn test_unconfigured_generator_fails_precondition() {
        let generator = Generator::unconfigured();
        assert!(!generator.is_configured());
        assert!(matches!(
            generator.require(),
            Err(EngineError::PreconditionFailed(_))
        ));
    }
}
