use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::models::{Candle, Timeframe, TradingPair};
use common::providers::MarketDataProvider;
use reqwest::{Client, Response};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::remote::{KlineRow, RemoteError, get_binance_base_url};
use crate::traits::RemoteResponse;

const MAX_KLINE_LIMIT: usize = 1500;

/// Public (unsigned) Binance USDⓈ-M futures market data.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    max_retries: u32,
}

impl BinanceClient {
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_base_url(get_binance_base_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent("signal_advisor/0.1.0")
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: 3,
        })
    }

    pub async fn fetch_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, RemoteError> {
        let url = format!("{}/fapi/v1/klines", self.base_url);
        let limit = limit.clamp(1, MAX_KLINE_LIMIT).to_string();

        let mut retry_count = 0;
        loop {
            match self.make_request(&url, symbol, interval, &limit).await {
                Ok(rows) => {
                    let candles = rows
                        .iter()
                        .map(|row| row.to_model())
                        .collect::<Result<Vec<_>, _>>()?;
                    debug!("Fetched {} {} klines for {}", candles.len(), interval, symbol);
                    return Ok(candles);
                }
                Err(e) if e.is_rate_limit() => {
                    retry_count += 1;
                    if retry_count > self.max_retries {
                        return Err(RemoteError::RetriesExhausted);
                    }

                    let backoff_seconds = 2_u64.pow(retry_count);
                    warn!(
                        "Rate limited for {} {}, backing off for {} seconds (attempt {}/{})",
                        symbol, interval, backoff_seconds, retry_count, self.max_retries
                    );
                    sleep(Duration::from_secs(backoff_seconds)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn make_request(
        &self,
        url: &str,
        symbol: &str,
        interval: &str,
        limit: &str,
    ) -> Result<Vec<KlineRow>, RemoteError> {
        let response = self
            .client
            .get(url)
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit)])
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        if let Some(used_weight) = response
            .headers()
            .get("x-mbx-used-weight-1m")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
        {
            if used_weight > 1000 {
                warn!("High API weight usage: {}", used_weight);
            } else {
                debug!("Used weights: {}/2400", used_weight);
            }
        }

        Ok(response.json::<Vec<KlineRow>>().await?)
    }

    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status.as_u16() {
            429 => Err(RemoteError::RateLimited),
            418 => Err(RemoteError::Banned),
            code => {
                let body = response.text().await.unwrap_or_default();
                Err(RemoteError::Status { status: code, body })
            }
        }
    }
}

#[async_trait]
impl MarketDataProvider for BinanceClient {
    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> anyhow::Result<Vec<Candle>> {
        let symbol = pair.exchange_symbol();
        let candles = self
            .fetch_klines(&symbol, timeframe.interval(), limit)
            .await
            .with_context(|| format!("Failed to fetch {} klines for {}", timeframe, pair))?;

        info!("Loaded {} {} candles for {}", candles.len(), timeframe, pair);
        Ok(candles)
    }
}
