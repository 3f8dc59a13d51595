use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::FeedsConfig;
use crate::error::Result;
use crate::models::{ActivityRecord, PowerRecord};

/// Read-only client for the two collaborator feeds. Both endpoints
/// return a JSON array on success; anything else (transport error,
/// timeout, HTTP error status, non-array body) fails the whole request,
/// never a partial result.
#[derive(Clone)]
pub struct FeedRepository {
    client: reqwest::Client,
    power_url: String,
    activity_url: String,
}

impl FeedRepository {
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            power_url: config.power_url.clone(),
            activity_url: config.activity_url.clone(),
        })
    }

    pub async fn fetch_power(&self) -> Result<Vec<PowerRecord>> {
        self.fetch_json(&self.power_url).await
    }

    pub async fn fetch_activity(&self) -> Result<Vec<ActivityRecord>> {
        self.fetch_json(&self.activity_url).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "fetching feed");

        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}
