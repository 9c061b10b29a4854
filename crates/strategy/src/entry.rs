use common::config::EntryConfig;
use common::models::{
    Abstention, AnchorLevel, Candle, Direction, EntryCheck, EntryCondition, EntryDecision, Stage,
    StageResult,
};
use tracing::debug;

use crate::patterns;

#[derive(Debug, Clone)]
pub struct EntryConfirmer {
    config: EntryConfig,
}

impl EntryConfirmer {
    pub fn new(config: &EntryConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn confirm(&self, anchor: &AnchorLevel, series: &[Candle]) -> StageResult<EntryDecision> {
        let window = self.config.window;
        let Some(last) = series.last().filter(|_| series.len() >= window) else {
            return Err(Abstention::insufficient(
                Stage::ConfirmEntry,
                format!(
                    "insufficient data: {} 1h candles, need {}",
                    series.len(),
                    window
                ),
            ));
        };

        let recent = &series[series.len() - window..];
        let avg_volume = recent.iter().map(|c| c.volume).sum::<f64>() / window as f64;

        let checks = vec![
            self.price_at_level(anchor, last),
            self.reversal_pattern(anchor.direction, series),
            self.oscillator_extreme(anchor.direction, last),
            self.volume_surge(last, avg_volume),
        ];

        let decision = EntryDecision::from_checks(anchor.direction, checks);
        debug!(
            "Entry gate {} for {}: {}",
            if decision.passed { "passed" } else { "failed" },
            anchor.direction,
            decision.summary()
        );
        Ok(decision)
    }

    fn price_at_level(&self, anchor: &AnchorLevel, last: &Candle) -> EntryCheck {
        let band = self.config.proximity_pct;
        let lower = anchor.price * (1.0 - band);
        let upper = anchor.price * (1.0 + band);
        let passed = (lower..=upper).contains(&last.close);

        let kind = match anchor.direction {
            Direction::Long => "support",
            Direction::Short => "resistance",
        };
        let detail = if passed {
            format!(
                "close {:.2} within {:.1}% of {} {:.2}",
                last.close,
                band * 100.0,
                kind,
                anchor.price
            )
        } else {
            format!(
                "price not at {} (close {:.2} vs level {:.2})",
                kind, last.close, anchor.price
            )
        };

        EntryCheck {
            condition: EntryCondition::PriceAtLevel,
            passed,
            detail,
        }
    }

    fn reversal_pattern(&self, direction: Direction, series: &[Candle]) -> EntryCheck {
        let found = patterns::detect(series);
        let (passed, name) = match direction {
            Direction::Long => (found.is_hammer, "hammer"),
            Direction::Short => (found.is_shooting_star, "shooting star"),
        };
        let detail = if passed {
            format!("{} on latest candle", name)
        } else {
            format!("no {} reversal pattern", name)
        };

        EntryCheck {
            condition: EntryCondition::ReversalPattern,
            passed,
            detail,
        }
    }

    fn oscillator_extreme(&self, direction: Direction, last: &Candle) -> EntryCheck {
        let (passed, detail) = match (last.indicators.rsi, direction) {
            (None, _) => (false, "RSI unavailable".to_string()),
            (Some(rsi), Direction::Long) if rsi < self.config.rsi_oversold => (
                true,
                format!("RSI {:.1} oversold (< {})", rsi, self.config.rsi_oversold),
            ),
            (Some(rsi), Direction::Long) => (false, format!("RSI not oversold ({:.1})", rsi)),
            (Some(rsi), Direction::Short) if rsi > self.config.rsi_overbought => (
                true,
                format!("RSI {:.1} overbought (> {})", rsi, self.config.rsi_overbought),
            ),
            (Some(rsi), Direction::Short) => (false, format!("RSI not overbought ({:.1})", rsi)),
        };

        EntryCheck {
            condition: EntryCondition::OscillatorExtreme,
            passed,
            detail,
        }
    }

    fn volume_surge(&self, last: &Candle, avg_volume: f64) -> EntryCheck {
        let (passed, detail) = if avg_volume > 0.0 {
            let ratio = last.volume / avg_volume;
            if last.volume > avg_volume * self.config.volume_surge {
                (
                    true,
                    format!("volume {:.2}x the {}-candle average", ratio, self.config.window),
                )
            } else {
                (false, format!("volume not expanding ({:.2}x average)", ratio))
            }
        } else {
            (false, "no trailing volume".to_string())
        };

        EntryCheck {
            condition: EntryCondition::VolumeSurge,
            passed,
            detail,
        }
    }
}
