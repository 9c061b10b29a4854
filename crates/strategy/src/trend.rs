use common::config::IndicatorConfig;
use common::models::{Abstention, Candle, Direction, Stage, StageResult, TrendSignal};

#[derive(Debug, Clone)]
pub struct TrendClassifier {
    min_history: usize,
}

impl TrendClassifier {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            min_history: config.ma_slow,
        }
    }

    /// `Err` when the series is too short to judge; otherwise a signal whose
    /// direction is `None` for a mixed or range-bound market.
    pub fn classify(&self, daily: &[Candle]) -> StageResult<TrendSignal> {
        if daily.len() < self.min_history {
            return Err(Abstention::insufficient(
                Stage::ClassifyTrend,
                format!(
                    "insufficient data: {} daily candles, need {}",
                    daily.len(),
                    self.min_history
                ),
            ));
        }

        let insufficient = || {
            Abstention::insufficient(
                Stage::ClassifyTrend,
                "insufficient data: latest daily candle has no fast MA or MACD",
            )
        };
        let last = daily.last().ok_or_else(insufficient)?;
        let ma_fast = last.indicators.ma_fast.ok_or_else(insufficient)?;
        let hist = last.indicators.macd_hist.ok_or_else(insufficient)?;

        let signal = if last.close > ma_fast && hist > 0.0 {
            TrendSignal {
                direction: Some(Direction::Long),
                reason: format!(
                    "daily uptrend (close {:.2} > fast MA {:.2}, MACD hist {:.4})",
                    last.close, ma_fast, hist
                ),
            }
        } else if last.close < ma_fast && hist < 0.0 {
            TrendSignal {
                direction: Some(Direction::Short),
                reason: format!(
                    "daily downtrend (close {:.2} < fast MA {:.2}, MACD hist {:.4})",
                    last.close, ma_fast, hist
                ),
            }
        } else {
            TrendSignal {
                direction: None,
                reason: format!(
                    "daily trend unclear (close {:.2}, fast MA {:.2}, MACD hist {:.4}), range-bound market",
                    last.close, ma_fast, hist
                ),
            }
        };

        Ok(signal)
    }
}
