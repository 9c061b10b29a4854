use common::config::LevelConfig;
use common::models::{Abstention, AnchorLevel, Candle, Direction, Stage, StageResult};
use tracing::debug;

pub fn fibonacci_retracement(high: f64, low: f64, ratio: f64) -> f64 {
    high - (high - low) * ratio
}

#[derive(Debug, Clone)]
pub struct LevelLocator {
    config: LevelConfig,
}

impl LevelLocator {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Support for longs, resistance for shorts: the tighter of the shallow
    /// Fibonacci retracement of the trailing window and the fast MA.
    pub fn locate(&self, direction: Direction, series: &[Candle]) -> StageResult<AnchorLevel> {
        let window = self.config.window;
        if series.len() < window {
            return Err(Abstention::insufficient(
                Stage::LocateLevel,
                format!(
                    "insufficient data: {} 4h candles, need {}",
                    series.len(),
                    window
                ),
            ));
        }

        let recent = &series[series.len() - window..];
        let swing_high = recent.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let swing_low = recent.iter().map(|c| c.low).fold(f64::MAX, f64::min);

        let ma_fast = series
            .last()
            .and_then(|c| c.indicators.ma_fast)
            .ok_or_else(|| {
                Abstention::insufficient(
                    Stage::LocateLevel,
                    "insufficient data: latest 4h candle has no fast MA",
                )
            })?;

        let fib_shallow = fibonacci_retracement(swing_high, swing_low, self.config.fib_shallow);
        let fib_deep = fibonacci_retracement(swing_high, swing_low, self.config.fib_deep);

        let price = match direction {
            Direction::Long => fib_shallow.max(ma_fast),
            Direction::Short => fib_shallow.min(ma_fast),
        };

        if !(price.is_finite() && price > 0.0) {
            return Err(Abstention::insufficient(
                Stage::LocateLevel,
                format!("invalid anchor price {}", price),
            ));
        }

        let level = AnchorLevel {
            direction,
            price,
            swing_high,
            swing_low,
            fib_shallow,
            fib_deep,
            ma_fast,
        };
        debug!("Anchor located: {}", level);
        Ok(level)
    }
}
