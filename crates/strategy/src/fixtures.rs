//! Candle and headline builders shared by the unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::models::{Candle, Headline, Indicators, MarketSnapshot, TradingPair};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn candle_at(index: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
    Candle::new(
        epoch() + Duration::hours(index as i64),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// Geometric uptrend: each close is `factor` times the previous one.
pub fn rising_series(len: usize, start: f64, factor: f64) -> Vec<Candle> {
    let mut close = start;
    (0..len)
        .map(|i| {
            let open = close;
            close = open * factor;
            candle_at(i, open, close * 1.001, open * 0.999, close, 100.0)
        })
        .collect()
}

/// Reflects every price through `axis`: rallies become selloffs and hammers
/// become shooting stars.
pub fn mirrored(series: &[Candle], axis: f64) -> Vec<Candle> {
    series
        .iter()
        .map(|c| {
            Candle::new(
                c.open_time,
                axis - c.open,
                axis - c.low,
                axis - c.high,
                axis - c.close,
                c.volume,
            )
        })
        .collect()
}

/// Sideways series oscillating inside `[center - amplitude, center + amplitude]`.
pub fn flat_series(len: usize, center: f64, amplitude: f64) -> Vec<Candle> {
    (0..len)
        .map(|i| candle_at(i, center, center + amplitude, center - amplitude, center, 100.0))
        .collect()
}

/// Hourly series sliding from `start` down to just above `target`, closing
/// with a high-volume hammer whose close sits at `target`.
pub fn selloff_into_hammer(len: usize, start: f64, target: f64) -> Vec<Candle> {
    let step = (start - target) / len as f64;
    let mut series: Vec<Candle> = (0..len - 1)
        .map(|i| {
            let open = start - step * i as f64;
            let close = open - step;
            candle_at(i, open, open + step * 0.1, close - step * 0.1, close, 100.0)
        })
        .collect();

    let body = target * 0.001;
    let open = target - body;
    series.push(candle_at(
        len - 1,
        open,
        target + body * 0.2,
        open - body * 3.0,
        target,
        500.0,
    ));
    series
}

pub fn with_indicators(mut candle: Candle, indicators: Indicators) -> Candle {
    candle.indicators = indicators;
    candle
}

pub fn headline(text: &str, hours_ago: i64, as_of: DateTime<Utc>) -> Headline {
    Headline::new(text, as_of - Duration::hours(hours_ago), "test")
}

/// Snapshot whose raw candles pass every long gate once indicators are
/// computed: accelerating daily uptrend, range-bound 4h, hourly selloff into
/// a hammer at the 4h support.
pub fn long_setup_snapshot() -> MarketSnapshot {
    let four_hour = flat_series(200, 1000.0, 10.0);
    // swing 990..1010, fib 38.2% = 1010 - 20 * 0.382; fast MA = 1000
    let support = 1010.0 - 20.0 * 0.382;

    MarketSnapshot {
        pair: TradingPair::new("BTC", "USDT"),
        as_of: epoch() + Duration::days(200),
        daily: rising_series(200, 100.0, 1.01),
        four_hour,
        one_hour: selloff_into_hammer(200, 1100.0, support),
        headlines: Vec::new(),
    }
}

/// Mirror of [`long_setup_snapshot`] for shorts: accelerating daily
/// decline, the same 4h range, hourly rally into a shooting star at 1000.
pub fn short_setup_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        pair: TradingPair::new("ETH", "USDT"),
        as_of: epoch() + Duration::days(200),
        daily: mirrored(&rising_series(200, 100.0, 1.01), 1000.0),
        four_hour: flat_series(200, 1000.0, 10.0),
        one_hour: mirrored(&selloff_into_hammer(200, 1100.0, 1000.0), 2000.0),
        headlines: Vec::new(),
    }
}
