use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Text completion backend. Implementations map the provider-agnostic
/// request onto one provider call and never retry on their own.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Provider id, one of [`crate::providers`].
    fn provider_name(&self) -> &str;

    /// Model the client sends requests to by default.
    fn model_name(&self) -> &str;
}
