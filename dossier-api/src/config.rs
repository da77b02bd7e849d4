use config::{Config, ConfigError, File};
use dossier_engine::config::{EngineSettings, LlmSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    pub cors: Option<CorsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Daily-rolling log files are written here when set.
    pub directory: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            llm: LlmSettings::default(),
            engine: EngineSettings::default(),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            logging: None,
        }
    }
}

impl ApiConfig {
    /// Reads the config file, writing a commented default one first when
    /// it does not exist yet.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, default_config_file()).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;
        config.database.path = expand_tilde(&config.database.path);
        if let Some(logging) = config.logging.as_mut() {
            logging.directory = logging.directory.as_deref().map(expand_tilde);
        }
        config.engine.catalog_path = config.engine.catalog_path.as_deref().map(expand_tilde);

        Ok((config, config_path))
    }
}

fn default_config_file() -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = 8080

[database]
path = "{}"

[cors]
allowed_origins = ["http://localhost:3000"]

[llm]
provider = "openai"
model = "gpt-4o-mini"
# api_key = "your-openai-key"  # or set OPENAI_API_KEY
# base_url = "https://api.openai.com"
max_tokens = 2000
temperature = 0.7

[engine]
# catalog_path = "~/.config/dossier/modules.toml"
choice_batch_size = 8
max_choice_generations = 3
# Unfinished choice sessions are dropped after this many idle seconds
choice_session_ttl_secs = 3600
max_choice_sessions_per_user = 20

[logging]
# directory = "~/.local/share/dossier/logs"
"#,
        get_default_db_path().display()
    )
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("dossier/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("dossier/api.db")
    } else {
        PathBuf::from("api.db")
    }
}
