use common::config::{StrategyConfig, WeightConfig};
use common::error::ConfigError;
use common::models::{
    Abstention, AnalysisOutcome, MarketSnapshot, Recommendation, Regime, Stage, StageResult,
};
use tracing::{debug, info};

use crate::entry::EntryConfirmer;
use crate::indicators::IndicatorSet;
use crate::levels::LevelLocator;
use crate::risk::RiskSizer;
use crate::sentiment::SentimentScorer;
use crate::trend::TrendClassifier;

const CONFIRMED_SETUP_SCORE: f64 = 1.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    weights: WeightConfig,
    indicators: IndicatorSet,
    sentiment: SentimentScorer,
    trend: TrendClassifier,
    levels: LevelLocator,
    entry: EntryConfirmer,
    risk: RiskSizer,
}

impl SignalEngine {
    pub fn new(config: &StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            weights: config.weights.clone(),
            indicators: IndicatorSet::new(&config.indicators)?,
            sentiment: SentimentScorer::new(&config.sentiment),
            trend: TrendClassifier::new(&config.indicators),
            levels: LevelLocator::new(&config.level),
            entry: EntryConfirmer::new(&config.entry),
            risk: RiskSizer::new(&config.risk),
        })
    }

    /// The only error is a caller mistake on `capital`.
    pub fn evaluate(
        &self,
        snapshot: &MarketSnapshot,
        capital: f64,
    ) -> Result<AnalysisOutcome, ConfigError> {
        if !(capital.is_finite() && capital > 0.0) {
            return Err(ConfigError::NonPositiveCapital(capital));
        }

        let outcome = AnalysisOutcome::from(self.run(snapshot, capital));
        match &outcome {
            AnalysisOutcome::Recommend(rec) => info!(
                "{} {} at {:.2}, stop {:.2}, ratio {:.4}",
                rec.symbol, rec.direction, rec.entry_price, rec.stop_loss, rec.position.position_ratio
            ),
            AnalysisOutcome::Abstain(abstention) => {
                info!("{}: abstaining, {}", snapshot.pair, abstention)
            }
        }
        Ok(outcome)
    }

    fn run(&self, snapshot: &MarketSnapshot, capital: f64) -> StageResult<Recommendation> {
        let daily = self.indicators.apply(&snapshot.daily);
        let four_hour = self.indicators.apply(&snapshot.four_hour);
        let one_hour = self.indicators.apply(&snapshot.one_hour);

        let sentiment = self.sentiment.score(&snapshot.headlines, snapshot.as_of);
        debug!("Sentiment {:.3} from {} headlines", sentiment.score, sentiment.headline_count);

        let trend = self.trend.classify(&daily)?;
        let Some(direction) = trend.direction else {
            return Err(Abstention::no_signal(Stage::ClassifyTrend, vec![trend.reason]));
        };
        debug!("{}", trend.reason);

        let anchor = self.levels.locate(direction, &four_hour)?;
        debug!("Anchor {}", anchor);

        let decision = self.entry.confirm(&anchor, &one_hour)?;
        if !decision.passed {
            let reasons = decision.failures().map(|c| c.detail.clone()).collect();
            return Err(Abstention::no_signal(Stage::ConfirmEntry, reasons));
        }

        let current_price = one_hour
            .last()
            .map(|c| c.close)
            .ok_or_else(|| Abstention::insufficient(Stage::SizeRisk, "no 1h close"))?;

        let entry_price = round2(anchor.price);
        let position = self.risk.size(
            entry_price,
            direction,
            capital,
            sentiment.score,
            Regime::Trending,
        );

        let composite_score = round4(
            self.weights.technical * CONFIRMED_SETUP_SCORE
                + self.weights.sentiment * sentiment.score * direction.sign(),
        );

        Ok(Recommendation {
            symbol: snapshot.pair.label(),
            direction,
            entry_price,
            current_price,
            stop_loss: position.stop_loss,
            take_profit_1: position.take_profit_1,
            take_profit_2: position.take_profit_2,
            technical_score: CONFIRMED_SETUP_SCORE,
            sentiment_score: round4(sentiment.score),
            composite_score,
            sentiment_summary: sentiment.summary.clone(),
            rationale: vec![
                trend.reason,
                anchor.to_string(),
                format!("1h entry confirmed: {}", decision.summary()),
                format!("news: {}", sentiment.summary),
            ],
            position,
            generated_at: snapshot.as_of,
        })
    }
}
