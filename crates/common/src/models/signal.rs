use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn sign(&self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub direction: Option<Direction>,
    pub reason: String,
}

/// Support (long) or resistance (short) price, only meaningful together with
/// the direction that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorLevel {
    pub direction: Direction,
    pub price: f64,
    pub swing_high: f64,
    pub swing_low: f64,
    pub fib_shallow: f64,
    pub fib_deep: f64,
    pub ma_fast: f64,
}

impl fmt::Display for AnchorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.direction {
            Direction::Long => "support",
            Direction::Short => "resistance",
        };
        write!(
            f,
            "4h {} {:.2} (fib 38.2% {:.2}, fast MA {:.2}, range {:.2}-{:.2})",
            kind, self.price, self.fib_shallow, self.ma_fast, self.swing_low, self.swing_high
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCondition {
    PriceAtLevel,
    ReversalPattern,
    OscillatorExtreme,
    VolumeSurge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryCheck {
    pub condition: EntryCondition,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDecision {
    pub passed: bool,
    pub direction: Direction,
    pub checks: Vec<EntryCheck>,
}

impl EntryDecision {
    pub fn from_checks(direction: Direction, checks: Vec<EntryCheck>) -> Self {
        Self {
            passed: checks.iter().all(|c| c.passed),
            direction,
            checks,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn summary(&self) -> String {
        let details: Vec<&str> = self.checks.iter().map(|c| c.detail.as_str()).collect();
        details.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Trending,
    Ranging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPlan {
    pub position_ratio: f64,
    pub position_value: f64,
    pub coin_amount: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub max_loss_usd: f64,
    pub sentiment_adjustment_pct: f64,
}
