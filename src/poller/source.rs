use async_trait::async_trait;
use serde::Deserialize;

use crate::channel::{ChannelError, Point};
use crate::synthetic::SyntheticGenerator;

/// Where a poll cycle gets its data. The live and synthetic paths are
/// interchangeable here so the cycle logic is identical for both.
#[async_trait]
pub trait PointSource: Send {
    async fn latest(&mut self) -> Result<Point, ChannelError>;
    async fn history(&mut self, results: usize) -> Result<Vec<Point>, ChannelError>;
}

/// Synthetic trajectory source; never fails.
#[derive(Debug, Default)]
pub struct SyntheticSource {
    generator: SyntheticGenerator,
}

impl SyntheticSource {
    pub fn new(generator: SyntheticGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl PointSource for SyntheticSource {
    async fn latest(&mut self) -> Result<Point, ChannelError> {
        Ok(self.generator.next_point())
    }

    async fn history(&mut self, results: usize) -> Result<Vec<Point>, ChannelError> {
        Ok(self.generator.history(results))
    }
}

#[derive(Debug, Deserialize)]
struct HistoryBody {
    points: Vec<Point>,
}

/// Live source: polls the facade's own read endpoints, exactly as the
/// browser client does.
pub struct FacadeSource {
    client: reqwest::Client,
    base_url: String,
}

impl FacadeSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PointSource for FacadeSource {
    async fn latest(&mut self) -> Result<Point, ChannelError> {
        let response = self.client.get(self.endpoint("/api/last")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response.json().await?)
    }

    async fn history(&mut self, results: usize) -> Result<Vec<Point>, ChannelError> {
        let response = self
            .client
            .get(self.endpoint("/api/history"))
            .query(&[("results", results.to_string())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Upstream {
                status: status.as_u16(),
            });
        }
        let body: HistoryBody = response.json().await?;
        Ok(body.points)
    }
}
