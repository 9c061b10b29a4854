use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}

impl Headline {
    pub fn new(text: impl Into<String>, published_at: DateTime<Utc>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            published_at,
            source: source.into(),
        }
    }

    /// Hours between publication and `as_of`. Negative for headlines dated
    /// after the analysis timestamp.
    pub fn age_hours(&self, as_of: DateTime<Utc>) -> f64 {
        (as_of - self.published_at).num_milliseconds() as f64 / 3_600_000.0
    }
}
