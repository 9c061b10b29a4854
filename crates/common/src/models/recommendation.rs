use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Candle, Direction, Headline, PositionPlan, Timeframe, TradingPair};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    FetchData,
    ComputeIndicators,
    ScoreSentiment,
    ClassifyTrend,
    LocateLevel,
    ConfirmEntry,
    SizeRisk,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FetchData => "fetch data",
            Self::ComputeIndicators => "compute indicators",
            Self::ScoreSentiment => "score sentiment",
            Self::ClassifyTrend => "classify trend",
            Self::LocateLevel => "locate level",
            Self::ConfirmEntry => "confirm entry",
            Self::SizeRisk => "size risk",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstainKind {
    DataInsufficient,
    ProviderFailure,
    NoSignal,
}

impl fmt::Display for AbstainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DataInsufficient => "insufficient data",
            Self::ProviderFailure => "provider failure",
            Self::NoSignal => "no signal",
        };
        f.write_str(name)
    }
}

pub type StageResult<T> = Result<T, Abstention>;

/// A "no recommendation" outcome. Always carries at least one reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abstention {
    pub stage: Stage,
    pub kind: AbstainKind,
    pub reasons: Vec<String>,
}

impl Abstention {
    pub fn new(stage: Stage, kind: AbstainKind, reasons: Vec<String>) -> Self {
        Self {
            stage,
            kind,
            reasons,
        }
    }

    pub fn insufficient(stage: Stage, reason: impl Into<String>) -> Self {
        Self::new(stage, AbstainKind::DataInsufficient, vec![reason.into()])
    }

    pub fn no_signal(stage: Stage, reasons: Vec<String>) -> Self {
        Self::new(stage, AbstainKind::NoSignal, reasons)
    }

    pub fn provider_failure(reason: impl Into<String>) -> Self {
        Self::new(Stage::FetchData, AbstainKind::ProviderFailure, vec![reason.into()])
    }
}

impl fmt::Display for Abstention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.stage, self.reasons.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub pair: TradingPair,
    pub as_of: DateTime<Utc>,
    pub daily: Vec<Candle>,
    pub four_hour: Vec<Candle>,
    pub one_hour: Vec<Candle>,
    pub headlines: Vec<Headline>,
}

impl MarketSnapshot {
    pub fn series(&self, timeframe: Timeframe) -> &[Candle] {
        match timeframe {
            Timeframe::Daily => &self.daily,
            Timeframe::FourHour => &self.four_hour,
            Timeframe::OneHour => &self.one_hour,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub current_price: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub position: PositionPlan,
    pub technical_score: f64,
    pub sentiment_score: f64,
    pub composite_score: f64,
    pub sentiment_summary: String,
    pub rationale: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Recommend(Recommendation),
    Abstain(Abstention),
}

impl AnalysisOutcome {
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Recommend(rec) => Some(rec),
            Self::Abstain(_) => None,
        }
    }

    pub fn abstention(&self) -> Option<&Abstention> {
        match self {
            Self::Recommend(_) => None,
            Self::Abstain(abstention) => Some(abstention),
        }
    }
}

impl From<Result<Recommendation, Abstention>> for AnalysisOutcome {
    fn from(value: Result<Recommendation, Abstention>) -> Self {
        match value {
            Ok(rec) => Self::Recommend(rec),
            Err(abstention) => Self::Abstain(abstention),
        }
    }
}
