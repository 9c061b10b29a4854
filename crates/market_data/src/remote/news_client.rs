use std::env;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::models::Headline;
use common::providers::NewsProvider;
use reqwest::Client;
use tracing::{debug, warn};

use crate::remote::{NewsResponse, RemoteError, get_news_base_url};
use crate::traits::RemoteResponse;

#[derive(Clone)]
pub struct CryptoCompareClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CryptoCompareClient {
    pub fn new() -> Result<Self, RemoteError> {
        let mut client = Self::with_base_url(get_news_base_url())?;
        client.api_key = env::var("CRYPTOCOMPARE_API_KEY").ok().filter(|k| !k.is_empty());
        Ok(client)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent("signal_advisor/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: None,
        })
    }

    pub async fn fetch_news(&self, asset: &str, limit: usize) -> Result<Vec<Headline>, RemoteError> {
        let mut request = self
            .client
            .get(&self.base_url)
            .query(&[("lang", "EN"), ("categories", asset)]);
        if let Some(key) = &self.api_key {
            request = request.header("authorization", format!("Apikey {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<NewsResponse>().await?;
        let mut headlines = Vec::with_capacity(limit);
        for item in payload.data.iter().take(limit) {
            match item.to_model() {
                Ok(headline) => headlines.push(headline),
                Err(e) => warn!("Skipping news item {:?}: {}", item.title, e),
            }
        }

        debug!("Fetched {} headlines for {}", headlines.len(), asset);
        Ok(headlines)
    }
}

#[async_trait]
impl NewsProvider for CryptoCompareClient {
    async fn fetch_headlines(&self, asset: &str, limit: usize) -> anyhow::Result<Vec<Headline>> {
        self.fetch_news(asset, limit)
            .await
            .with_context(|| format!("Failed to fetch CryptoCompare news for {}", asset))
    }
}
