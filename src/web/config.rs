use serde::Deserialize;
use thiserror::Error;

use crate::channel::ChannelConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Optional YAML file overlaid with environment variables; env wins.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Config::from_file(p)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(id) = env_value("TS_CHANNEL_ID") {
            self.channel.id = Some(id);
        }
        if let Some(key) = env_value("TS_READ_KEY") {
            self.channel.read_key = Some(key);
        }
        if let Some(field) = env_value("TS_LAT_FIELD") {
            self.channel.lat_field = field;
        }
        if let Some(field) = env_value("TS_LNG_FIELD") {
            self.channel.lng_field = field;
        }
        if let Some(base) = env_value("TS_BASE_URL") {
            self.channel.base_url = base;
        }
        if let Some(port) = env_value("PORT") {
            self.web.bind = format!("0.0.0.0:{}", port);
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
