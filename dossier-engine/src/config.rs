use crate::llm::GenerationConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings shared by the runner binary and the HTTP server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_provider() -> String {
    dossier_llm_sdk::providers::OPENAI.to_string()
}

fn default_model() -> String {
    GenerationConfig::default().model
}

fn default_max_tokens() -> u32 {
    GenerationConfig::default().max_tokens
}

fn default_temperature() -> f32 {
    GenerationConfig::default().temperature
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl LlmSettings {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Configured key, falling back to `OPENAI_API_KEY`. Blank keys count as
    /// missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default = "default_choice_batch_size")]
    pub choice_batch_size: usize,
    #[serde(default = "default_max_choice_generations")]
    pub max_choice_generations: u32,
    /// Idle time after which an unfinished choice session is dropped.
    #[serde(default = "default_choice_session_ttl_secs")]
    pub choice_session_ttl_secs: u64,
    #[serde(default = "default_max_choice_sessions_per_user")]
    pub max_choice_sessions_per_user: usize,
}

fn default_choice_batch_size() -> usize {
    8
}

fn default_max_choice_generations() -> u32 {
    3
}

fn default_choice_session_ttl_secs() -> u64 {
    3600
}

fn default_max_choice_sessions_per_user() -> usize {
    20
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            catalog_path: None,
            choice_batch_size: default_choice_batch_size(),
            max_choice_generations: default_max_choice_generations(),
            choice_session_ttl_secs: default_choice_session_ttl_secs(),
            max_choice_sessions_per_user: default_max_choice_sessions_per_user(),
        }
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&content)?;
    Ok(config)
}
