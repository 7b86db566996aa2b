use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub live_score: LiveScoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Allowed CORS origins; an empty list means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub match_csv: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveScoreConfig {
    pub base_url: String,
    pub host_header: String,
    /// Name of the environment variable holding the RapidAPI key.
    pub api_key_env: String,
    pub live_matches_path: String,
    /// Only series whose name contains this string are considered live.
    pub series_filter: String,
    pub poll_interval_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolves the live-score API key from the environment, if present.
    pub fn live_score_api_key(&self) -> Option<String> {
        std::env::var(&self.live_score.api_key_env).ok()
    }
}
