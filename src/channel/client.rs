use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::error::ChannelError;
use super::parsing;
use super::types::Point;

fn default_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}

fn default_lat_field() -> String {
    "field1".to_string()
}

fn default_lng_field() -> String {
    "field2".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub read_key: Option<String>,
    #[serde(default = "default_lat_field")]
    pub lat_field: String,
    #[serde(default = "default_lng_field")]
    pub lng_field: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            id: None,
            read_key: None,
            lat_field: default_lat_field(),
            lng_field: default_lng_field(),
        }
    }
}

/// Client for one upstream telemetry channel. Stateless beyond the reqwest
/// connection pool; no caching and no retries, a failed call surfaces
/// directly to the caller.
pub struct ChannelClient {
    client: Client,
    config: ChannelConfig,
}

impl ChannelClient {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn channel_id(&self) -> Result<&str, ChannelError> {
        self.config
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ChannelError::MissingChannelId)
    }

    fn feed_url(&self, resource: &str) -> Result<String, ChannelError> {
        let id = self.channel_id()?;
        Ok(format!(
            "{}/channels/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            id,
            resource
        ))
    }

    async fn fetch(&self, resource: &str, query: &[(&str, String)]) -> Result<Value, ChannelError> {
        let url = self.feed_url(resource)?;
        let mut request = self.client.get(&url).query(query);
        // The read key is appended only when configured; public channels
        // answer without one.
        if let Some(key) = self.config.read_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.query(&[("api_key", key)]);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    /// Fetch and validate the single most recent record.
    pub async fn latest(&self) -> Result<Point, ChannelError> {
        let body = self.fetch("feeds/last.json", &[]).await?;
        parsing::parse_latest(&body, &self.config.lat_field, &self.config.lng_field)
    }

    /// Fetch the `requested` most recent records (clamped into [1, 100],
    /// defaulting to 10) as newest-first Points.
    pub async fn history(&self, requested: Option<i64>) -> Result<Vec<Point>, ChannelError> {
        let results = parsing::clamp_results(requested);
        let body = self
            .fetch("feeds.json", &[("results", results.to_string())])
            .await?;
        let feeds = body.get("feeds").and_then(Value::as_array);
        Ok(parsing::parse_history(
            feeds.map(Vec::as_slice).unwrap_or(&[]),
            &self.config.lat_field,
            &self.config.lng_field,
        ))
    }
}
