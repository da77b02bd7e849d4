//! # Dossier LLM SDK
//!
//! Provider-agnostic text completion used by the dossier engine, with an
//! OpenAI-compatible Chat Completions client.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dossier_llm_sdk::client::LlmClient;
//! use dossier_llm_sdk::openai::OpenAIClient;
//! use dossier_llm_sdk::types::{CompletionRequest, Message, ResponseFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new("your-api-key")?.with_model("gpt-4o-mini");
//!     let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("Bonjour")])
//!         .with_max_tokens(256)
//!         .with_response_format(ResponseFormat::JsonObject);
//!     let response = client.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod openai;
pub mod providers;
pub mod types;
