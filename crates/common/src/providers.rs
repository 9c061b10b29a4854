use async_trait::async_trait;

use crate::models::{Candle, Headline, Timeframe, TradingPair};

/// Source of OHLCV history. Implementations return raw candles (no
/// indicators), ordered by open time ascending.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> anyhow::Result<Vec<Candle>>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_headlines(&self, asset: &str, limit: usize) -> anyhow::Result<Vec<Headline>>;
}
