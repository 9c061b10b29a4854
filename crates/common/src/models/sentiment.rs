use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    StronglyBullish,
    Bullish,
    Neutral,
    Bearish,
    StronglyBearish,
    NoData,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.5 {
            Self::StronglyBullish
        } else if score > 0.2 {
            Self::Bullish
        } else if score > -0.2 {
            Self::Neutral
        } else if score > -0.5 {
            Self::Bearish
        } else {
            Self::StronglyBearish
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::StronglyBullish => "strongly bullish",
            Self::Bullish => "leaning bullish",
            Self::Neutral => "neutral",
            Self::Bearish => "leaning bearish",
            Self::StronglyBearish => "strongly bearish",
            Self::NoData => "no news data, neutral",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineContribution {
    pub title: String,
    pub source: String,
    pub keywords: Vec<String>,
    /// raw keyword sum x amplifier x decay
    pub weighted: f64,
    pub age_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Always within [-1, 1].
    pub score: f64,
    pub label: SentimentLabel,
    pub headline_count: usize,
    pub contributions: Vec<HeadlineContribution>,
    pub summary: String,
}

impl SentimentResult {
    pub fn no_data(headline_count: usize) -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::NoData,
            headline_count,
            contributions: Vec::new(),
            summary: SentimentLabel::NoData.to_string(),
        }
    }
}
