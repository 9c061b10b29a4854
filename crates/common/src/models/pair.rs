use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const KNOWN_QUOTES: [&str; 5] = ["USDT", "USDC", "BUSD", "FDUSD", "BTC"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: &str, quote: &str) -> Self {
        Self {
            base: base.to_uppercase(),
            quote: quote.to_uppercase(),
        }
    }

    pub fn exchange_symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for TradingPair {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_uppercase();
        if raw.is_empty() {
            return Err(ConfigError::InvalidSymbol(s.to_string()));
        }

        if let Some((base, quote)) = raw.split_once('/') {
            if base.is_empty() || quote.is_empty() {
                return Err(ConfigError::InvalidSymbol(s.to_string()));
            }
            return Ok(Self::new(base, quote));
        }

        KNOWN_QUOTES
            .iter()
            .find_map(|quote| {
                raw.strip_suffix(quote)
                    .filter(|base| !base.is_empty())
                    .map(|base| Self::new(base, quote))
            })
            .ok_or_else(|| ConfigError::InvalidSymbol(s.to_string()))
    }
}
