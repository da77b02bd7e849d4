//! Provider name constants

/// OpenAI provider
pub const OPENAI: &str = "openai";

/// Any server speaking the OpenAI Chat Completions protocol (Mistral, vLLM, Ollama, ...)
pub const OPENAI_COMPATIBLE: &str = "openai_compatible";
