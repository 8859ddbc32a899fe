use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub storage: StorageConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub max_concurrent: usize,
    // Loaded from env
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// How many mentions the dashboard page shows at most.
    pub recent_limit: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_text =
            std::fs::read_to_string("config.toml").context("Failed to read config.toml")?;
        let mut config: AppConfig =
            toml::from_str(&config_text).context("Failed to parse config.toml")?;

        config.llm.api_key = std::env::var("LLM_API_KEY").context("LLM_API_KEY not set")?;

        Ok(config)
    }
}
