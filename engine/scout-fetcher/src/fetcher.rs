use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::models::MarketSnapshot;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

/// Source of the full player market snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the whole market in one request. No retries: a failure aborts the cycle.
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, FetchError>;
}

/// Cartola market feed client
pub struct MarketFeedClient {
    client: Client,
    url: String,
}

impl MarketFeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client, url: config.url.clone() })
    }
}

#[async_trait]
impl SnapshotSource for MarketFeedClient {
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, FetchError> {
        info!("Fetching market snapshot from: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let snapshot: MarketSnapshot = serde_json::from_str(&body)?;

        info!("Fetched {} players ({} bytes)", snapshot.players.len(), body.len());
        Ok(snapshot)
    }
}
