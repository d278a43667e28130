use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub slack: SlackConfig,
    pub digitalocean: DigitalOceanConfig,
    #[serde(default = "default_poll_config")]
    pub poll: PollConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SlackConfig {
    pub token: String,
    pub channel_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DigitalOceanConfig {
    pub token: String,
    pub database_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    5
}

fn default_poll_config() -> PollConfig {
    PollConfig {
        interval_secs: default_interval_secs(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}
