use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub window: usize,
    pub fib_shallow: f64,
    pub fib_deep: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub window: usize,
    pub proximity_pct: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub volume_surge: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub max_position_ratio_trend: f64,
    pub max_position_ratio_range: f64,
    pub min_position_ratio: f64,
    pub max_loss_ratio: f64,
    pub stop_loss_offset: f64,
    pub take_profit_1_r: f64,
    pub take_profit_2_r: f64,
    pub sentiment_sensitivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub technical: f64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentConfig {
    pub bullish: Vec<KeywordWeight>,
    pub bearish: Vec<KeywordWeight>,
    pub amplifiers: Vec<KeywordWeight>,
    pub freshness_hours: f64,
    pub decay_per_hour: f64,
    pub normalization: f64,
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    pub candle_limit: usize,
    pub headline_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub indicators: IndicatorConfig,
    pub level: LevelConfig,
    pub entry: EntryConfig,
    pub risk: RiskConfig,
    pub weights: WeightConfig,
    pub sentiment: SentimentConfig,
    pub fetch: FetchConfig,
}

fn table(entries: &[(&str, f64)]) -> Vec<KeywordWeight> {
    entries
        .iter()
        .map(|(keyword, weight)| KeywordWeight {
            keyword: keyword.to_string(),
            weight: *weight,
        })
        .collect()
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            bullish: table(&[
                ("降息", 3.0),
                ("rate cut", 3.0),
                ("interest rate cut", 3.0),
                ("减息", 3.0),
                ("dovish", 2.0),
                ("easing", 2.0),
                ("增持", 2.0),
                ("buying", 2.0),
                ("bullish", 2.0),
                ("利好", 2.0),
                ("positive", 1.0),
                ("optimistic", 1.0),
                ("突破", 1.0),
                ("breakout", 1.0),
                ("rally", 1.0),
                ("上涨", 1.0),
                ("surge", 1.0),
                ("pump", 1.0),
                ("采用", 2.0),
                ("adoption", 2.0),
                ("approved", 2.0),
                ("etf通过", 3.0),
                ("etf approved", 3.0),
                ("不会清算", 2.0),
                ("not liquidate", 2.0),
                ("hold", 1.0),
            ]),
            bearish: table(&[
                ("加息", -3.0),
                ("rate hike", -3.0),
                ("interest rate hike", -3.0),
                ("升息", -3.0),
                ("hawkish", -2.0),
                ("tightening", -2.0),
                ("抛售", -2.0),
                ("selling", -2.0),
                ("bearish", -2.0),
                ("利空", -2.0),
                ("negative", -1.0),
                ("pessimistic", -1.0),
                ("暴跌", -2.0),
                ("crash", -2.0),
                ("dump", -2.0),
                ("下跌", -1.0),
                ("drop", -1.0),
                ("fall", -1.0),
                ("监管", -2.0),
                ("regulation", -2.0),
                ("ban", -3.0),
                ("清算", -3.0),
                ("liquidate", -3.0),
                ("liquidation", -3.0),
                ("担忧", -1.0),
                ("concern", -1.0),
                ("worry", -1.0),
            ]),
            amplifiers: table(&[
                ("特朗普", 1.5),
                ("trump", 1.5),
                ("马斯克", 1.5),
                ("musk", 1.5),
                ("elon", 1.5),
                ("美联储", 2.0),
                ("federal reserve", 2.0),
                ("fed", 2.0),
                ("鲍威尔", 1.5),
                ("powell", 1.5),
            ]),
            freshness_hours: 24.0,
            decay_per_hour: 0.05,
            normalization: 5.0,
            top_n: 3,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig {
                ma_fast: 60,
                ma_slow: 120,
                macd_fast: 12,
                macd_slow: 26,
                macd_signal: 9,
                rsi_period: 14,
            },
            level: LevelConfig {
                window: 20,
                fib_shallow: 0.382,
                fib_deep: 0.618,
            },
            entry: EntryConfig {
                window: 20,
                proximity_pct: 0.01,
                rsi_oversold: 30.0,
                rsi_overbought: 70.0,
                volume_surge: 1.2,
            },
            risk: RiskConfig {
                max_position_ratio_trend: 0.03,
                max_position_ratio_range: 0.02,
                min_position_ratio: 0.01,
                max_loss_ratio: 0.01,
                stop_loss_offset: 0.02,
                take_profit_1_r: 3.0,
                take_profit_2_r: 6.0,
                sentiment_sensitivity: 0.1,
            },
            weights: WeightConfig {
                technical: 0.7,
                sentiment: 0.3,
            },
            sentiment: SentimentConfig::default(),
            fetch: FetchConfig {
                candle_limit: 200,
                headline_limit: 10,
            },
        }
    }
}

fn read<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            debug!("Config override {}={}", key, raw.trim());
            raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            })
        }
        None => Ok(default),
    }
}

impl StrategyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();

        let config = Self {
            indicators: IndicatorConfig {
                ma_fast: read(&lookup, "MA_FAST", d.indicators.ma_fast)?,
                ma_slow: read(&lookup, "MA_SLOW", d.indicators.ma_slow)?,
                macd_fast: read(&lookup, "MACD_FAST", d.indicators.macd_fast)?,
                macd_slow: read(&lookup, "MACD_SLOW", d.indicators.macd_slow)?,
                macd_signal: read(&lookup, "MACD_SIGNAL", d.indicators.macd_signal)?,
                rsi_period: read(&lookup, "RSI_PERIOD", d.indicators.rsi_period)?,
            },
            level: LevelConfig {
                window: read(&lookup, "LEVEL_WINDOW", d.level.window)?,
                ..d.level
            },
            entry: EntryConfig {
                window: read(&lookup, "ENTRY_WINDOW", d.entry.window)?,
                proximity_pct: read(&lookup, "PRICE_PROXIMITY_PCT", d.entry.proximity_pct)?,
                rsi_oversold: read(&lookup, "RSI_OVERSOLD", d.entry.rsi_oversold)?,
                rsi_overbought: read(&lookup, "RSI_OVERBOUGHT", d.entry.rsi_overbought)?,
                volume_surge: read(&lookup, "VOLUME_SURGE", d.entry.volume_surge)?,
            },
            risk: RiskConfig {
                max_position_ratio_trend: read(
                    &lookup,
                    "MAX_POSITION_RATIO",
                    d.risk.max_position_ratio_trend,
                )?,
                max_position_ratio_range: read(
                    &lookup,
                    "MAX_POSITION_RANGE_RATIO",
                    d.risk.max_position_ratio_range,
                )?,
                min_position_ratio: read(&lookup, "MIN_POSITION_RATIO", d.risk.min_position_ratio)?,
                max_loss_ratio: read(&lookup, "MAX_LOSS_RATIO", d.risk.max_loss_ratio)?,
                stop_loss_offset: read(&lookup, "STOP_LOSS_OFFSET", d.risk.stop_loss_offset)?,
                ..d.risk
            },
            weights: WeightConfig {
                technical: read(&lookup, "TECHNICAL_WEIGHT", d.weights.technical)?,
                sentiment: read(&lookup, "NEWS_WEIGHT", d.weights.sentiment)?,
            },
            sentiment: SentimentConfig {
                freshness_hours: read(&lookup, "NEWS_DECAY_HOURS", d.sentiment.freshness_hours)?,
                decay_per_hour: read(&lookup, "NEWS_DECAY_RATE", d.sentiment.decay_per_hour)?,
                ..d.sentiment
            },
            fetch: FetchConfig {
                candle_limit: read(&lookup, "CANDLE_LIMIT", d.fetch.candle_limit)?,
                headline_limit: read(&lookup, "HEADLINE_LIMIT", d.fetch.headline_limit)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| Err(ConfigError::Invariant(msg));

        let ind = &self.indicators;
        if [ind.ma_fast, ind.ma_slow, ind.macd_fast, ind.macd_slow, ind.macd_signal, ind.rsi_period]
            .contains(&0)
        {
            return fail("indicator windows must be non-zero".to_string());
        }
        if ind.ma_fast >= ind.ma_slow {
            return fail(format!("ma_fast ({}) must be below ma_slow ({})", ind.ma_fast, ind.ma_slow));
        }
        if ind.macd_fast >= ind.macd_slow {
            return fail("macd_fast must be below macd_slow".to_string());
        }
        if self.level.window == 0 || self.entry.window == 0 {
            return fail("level and entry windows must be non-zero".to_string());
        }
        if self.fetch.candle_limit < ind.ma_slow {
            return fail(format!(
                "candle_limit ({}) cannot cover ma_slow ({})",
                self.fetch.candle_limit, ind.ma_slow
            ));
        }

        let risk = &self.risk;
        for (name, value) in [
            ("max_position_ratio_trend", risk.max_position_ratio_trend),
            ("max_position_ratio_range", risk.max_position_ratio_range),
            ("min_position_ratio", risk.min_position_ratio),
            ("max_loss_ratio", risk.max_loss_ratio),
            ("stop_loss_offset", risk.stop_loss_offset),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return fail(format!("{} must be within (0, 1), got {}", name, value));
            }
        }
        if risk.min_position_ratio > risk.max_position_ratio_range
            || risk.min_position_ratio > risk.max_position_ratio_trend
        {
            return fail("min_position_ratio exceeds a position ceiling".to_string());
        }
        if !(0.0..=1.0).contains(&risk.sentiment_sensitivity) {
            return fail("sentiment_sensitivity must be within [0, 1]".to_string());
        }

        if self.entry.rsi_oversold >= self.entry.rsi_overbought {
            return fail("rsi_oversold must be below rsi_overbought".to_string());
        }
        if (self.weights.technical + self.weights.sentiment - 1.0).abs() > 1e-9 {
            return fail("technical and sentiment weights must sum to 1".to_string());
        }
        if self.sentiment.normalization <= 0.0 || self.sentiment.decay_per_hour < 0.0 {
            return fail("sentiment normalization must be positive, decay non-negative".to_string());
        }
        if self
            .sentiment
            .amplifiers
            .iter()
            .any(|a| a.weight < 1.0)
        {
            return fail("amplifier multipliers must be at least 1.0".to_string());
        }

        Ok(())
    }
}
