use common::config::IndicatorConfig;
use common::error::ConfigError;
use common::models::{Candle, Indicators};
use ta::Next;
use ta::indicators::{
    MovingAverageConvergenceDivergence, RelativeStrengthIndex, SimpleMovingAverage,
};

/// Fresh-state prototypes of every indicator the pipeline reads. Each series
/// is run through clones, so one set serves all timeframes.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    config: IndicatorConfig,
    ma_fast: SimpleMovingAverage,
    ma_slow: SimpleMovingAverage,
    macd: MovingAverageConvergenceDivergence,
    rsi: RelativeStrengthIndex,
}

fn rejected<E: std::fmt::Debug>(name: &str) -> impl FnOnce(E) -> ConfigError + '_ {
    move |e| ConfigError::Indicator(format!("{}: {:?}", name, e))
}

impl IndicatorSet {
    pub fn new(config: &IndicatorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.clone(),
            ma_fast: SimpleMovingAverage::new(config.ma_fast).map_err(rejected("ma_fast"))?,
            ma_slow: SimpleMovingAverage::new(config.ma_slow).map_err(rejected("ma_slow"))?,
            macd: MovingAverageConvergenceDivergence::new(
                config.macd_fast,
                config.macd_slow,
                config.macd_signal,
            )
            .map_err(rejected("macd"))?,
            rsi: RelativeStrengthIndex::new(config.rsi_period).map_err(rejected("rsi"))?,
        })
    }

    pub fn macd_lookback(&self) -> usize {
        self.config.macd_slow + self.config.macd_signal - 1
    }

    /// Returns a copy of `candles` with indicator fields filled in. A field
    /// stays `None` until the series is long enough for it.
    pub fn apply(&self, candles: &[Candle]) -> Vec<Candle> {
        let mut ma_fast = self.ma_fast.clone();
        let mut ma_slow = self.ma_slow.clone();
        let mut macd = self.macd.clone();
        let mut rsi = self.rsi.clone();
        let macd_lookback = self.macd_lookback();

        candles
            .iter()
            .enumerate()
            .map(|(i, candle)| {
                let seen = i + 1;
                let close = candle.close;

                let fast = ma_fast.next(close);
                let slow = ma_slow.next(close);
                let m = macd.next(close);
                let r = rsi.next(close);

                let macd_ready = seen >= macd_lookback;
                candle.clone().with_indicators(Indicators {
                    ma_fast: (seen >= self.config.ma_fast).then_some(fast),
                    ma_slow: (seen >= self.config.ma_slow).then_some(slow),
                    macd: macd_ready.then_some(m.macd),
                    macd_signal: macd_ready.then_some(m.signal),
                    macd_hist: macd_ready.then_some(m.histogram),
                    rsi: (seen > self.config.rsi_period).then_some(r),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{candle_at, rising_series};
    use common::config::StrategyConfig;

    fn set() -> IndicatorSet {
        IndicatorSet::new(&StrategyConfig::default().indicators).unwrap()
    }

    #[test]
    fn fields_undefined_until_lookback() {
        let out = set().apply(&rising_series(130, 100.0, 1.01));

        assert!(out[58].indicators.ma_fast.is_none());
        assert!(out[59].indicators.ma_fast.is_some());
        assert!(out[118].indicators.ma_slow.is_none());
        assert!(out[119].indicators.ma_slow.is_some());
        assert!(out[32].indicators.macd_hist.is_none());
        assert!(out[33].indicators.macd_hist.is_some());
        assert!(out[13].indicators.rsi.is_none());
        assert!(out[14].indicators.rsi.is_some());
    }

    #[test]
    fn simple_average_matches_window_mean() {
        let config = IndicatorConfig {
            ma_fast: 3,
            ma_slow: 5,
            macd_fast: 2,
            macd_slow: 3,
            macd_signal: 2,
            rsi_period: 2,
        };
        let candles: Vec<Candle> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .enumerate()
            .map(|(i, c)| candle_at(i, *c, *c, *c, *c, 1.0))
            .collect();

        let out = IndicatorSet::new(&config).unwrap().apply(&candles);
        assert_eq!(out[2].indicators.ma_fast, Some(2.0));
        assert_eq!(out[4].indicators.ma_fast, Some(4.0));
        assert_eq!(out[4].indicators.ma_slow, Some(3.0));
    }

    #[test]
    fn accelerating_uptrend_has_positive_momentum() {
        let out = set().apply(&rising_series(200, 100.0, 1.01));
        let last = out.last().unwrap().indicators;

        assert!(last.macd.unwrap() > 0.0);
        assert!(last.macd_hist.unwrap() > 0.0);
        assert!(last.rsi.unwrap() > 70.0);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut config = StrategyConfig::default().indicators;
        config.rsi_period = 0;
        assert!(matches!(IndicatorSet::new(&config), Err(ConfigError::Indicator(_))));
    }

    #[test]
    fn apply_leaves_prototypes_untouched() {
        let set = set();
        let series = rising_series(150, 50.0, 1.005);
        assert_eq!(set.apply(&series), set.apply(&series));
    }
}
