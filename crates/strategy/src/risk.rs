use common::config::RiskConfig;
use common::models::{Direction, PositionPlan, Regime};
use tracing::debug;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone)]
pub struct RiskSizer {
    config: RiskConfig,
}

impl RiskSizer {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn max_ratio(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Trending => self.config.max_position_ratio_trend,
            Regime::Ranging => self.config.max_position_ratio_range,
        }
    }

    fn clamp_ratio(&self, ratio: f64, max_ratio: f64) -> f64 {
        ratio.max(self.config.min_position_ratio).min(max_ratio)
    }

    /// `entry` and `capital` are expected positive and finite, the engine
    /// checks both before sizing.
    pub fn size(
        &self,
        entry: f64,
        direction: Direction,
        capital: f64,
        sentiment_score: f64,
        regime: Regime,
    ) -> PositionPlan {
        let cfg = &self.config;
        let sign = direction.sign();

        let stop_loss = entry * (1.0 - sign * cfg.stop_loss_offset);
        let per_unit_loss = (entry - stop_loss).abs();

        let max_loss_usd = capital * cfg.max_loss_ratio;
        let raw_units = max_loss_usd / per_unit_loss;
        let raw_ratio = raw_units * entry / capital;

        let max_ratio = self.max_ratio(regime);
        let capped_ratio = raw_ratio.min(max_ratio);

        let sentiment = if sentiment_score.is_finite() {
            sentiment_score.max(-1.0).min(1.0)
        } else {
            0.0
        };
        let multiplier = 1.0 + sentiment * cfg.sentiment_sensitivity;
        let adjusted = self.clamp_ratio(capped_ratio * multiplier, max_ratio);

        let position_ratio = self.clamp_ratio(round_to(adjusted, 4), max_ratio);
        let position_value = capital * position_ratio;
        let coin_amount = position_value / entry;

        let take_profit_1 = entry + sign * cfg.take_profit_1_r * per_unit_loss;
        let take_profit_2 = entry + sign * cfg.take_profit_2_r * per_unit_loss;

        debug!(
            "Sizing {} at {:.2}: raw ratio {:.4}, capped {:.4}, sentiment x{:.3} -> {:.4}",
            direction, entry, raw_ratio, capped_ratio, multiplier, position_ratio
        );

        PositionPlan {
            position_ratio,
            position_value: round_to(position_value, 2),
            coin_amount: round_to(coin_amount, 6),
            stop_loss: round_to(stop_loss, 2),
            take_profit_1: round_to(take_profit_1, 2),
            take_profit_2: round_to(take_profit_2, 2),
            max_loss_usd: round_to(max_loss_usd, 2),
            sentiment_adjustment_pct: round_to((multiplier - 1.0) * 100.0, 1),
        }
    }
}
