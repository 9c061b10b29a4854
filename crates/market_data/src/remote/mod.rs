use std::env;

use thiserror::Error;

pub mod binance_client;
pub mod kline_response;
pub mod news_client;
pub mod news_response;

pub use binance_client::BinanceClient;
pub use kline_response::KlineRow;
pub use news_client::CryptoCompareClient;
pub use news_response::{NewsItem, NewsResponse};

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Failed to send request: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP 429: Too Many Requests")]
    RateLimited,
    #[error("HTTP 418: IP has been auto-banned")]
    Banned,
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed field {field}: {value:?}")]
    Malformed { field: &'static str, value: String },
    #[error("Max retries exceeded for rate limit")]
    RetriesExhausted,
}

impl RemoteError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Banned)
    }
}

pub fn get_binance_base_url() -> String {
    env::var("BINANCE_FAPI_URL").unwrap_or_else(|_| "https://fapi.binance.com".to_string())
}

pub fn get_news_base_url() -> String {
    env::var("CRYPTOCOMPARE_NEWS_URL")
        .unwrap_or_else(|_| "https://min-api.cryptocompare.com/data/v2/news/".to_string())
}
