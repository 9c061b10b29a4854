use common::models::Candle;

/// Bodies smaller than this are treated as doji: neither pattern.
pub const BODY_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReversalPatterns {
    pub is_hammer: bool,
    pub is_shooting_star: bool,
}

pub fn detect(series: &[Candle]) -> ReversalPatterns {
    series.last().map(detect_candle).unwrap_or_default()
}

pub fn detect_candle(candle: &Candle) -> ReversalPatterns {
    let body = candle.body();
    if body < BODY_EPSILON {
        return ReversalPatterns::default();
    }

    let upper = candle.upper_wick();
    let lower = candle.lower_wick();

    // evaluated independently, exclusivity comes from the polarity terms
    let is_hammer = lower >= 2.0 * body && upper <= 0.5 * body && candle.is_bullish();
    let is_shooting_star = upper >= 2.0 * body && lower <= 0.5 * body && candle.is_bearish();

    ReversalPatterns {
        is_hammer,
        is_shooting_star,
    }
}
