use chrono::{DateTime, Utc};
use common::config::{FetchConfig, StrategyConfig};
use common::error::ConfigError;
use common::models::{
    Abstention, AnalysisOutcome, Candle, MarketSnapshot, StageResult, Timeframe, TradingPair,
};
use common::providers::{MarketDataProvider, NewsProvider};
use tracing::{debug, info, warn};

use crate::engine::SignalEngine;

pub struct StrategyService<M, N> {
    market: M,
    news: N,
    fetch: FetchConfig,
    engine: SignalEngine,
}

impl<M: MarketDataProvider, N: NewsProvider> StrategyService<M, N> {
    pub fn new(market: M, news: N, config: &StrategyConfig) -> Result<Self, ConfigError> {
        let engine = SignalEngine::new(config)?;
        Ok(Self {
            market,
            news,
            fetch: config.fetch.clone(),
            engine,
        })
    }

    pub async fn analyze(
        &self,
        pair: &TradingPair,
        capital: f64,
    ) -> Result<AnalysisOutcome, ConfigError> {
        self.analyze_at(pair, capital, Utc::now()).await
    }

    pub async fn analyze_at(
        &self,
        pair: &TradingPair,
        capital: f64,
        as_of: DateTime<Utc>,
    ) -> Result<AnalysisOutcome, ConfigError> {
        if !(capital.is_finite() && capital > 0.0) {
            return Err(ConfigError::NonPositiveCapital(capital));
        }

        info!("Analyzing {} with capital {:.2}", pair, capital);
        match self.snapshot(pair, as_of).await {
            Ok(snapshot) => self.engine.evaluate(&snapshot, capital),
            Err(abstention) => {
                warn!("{}: {}", pair, abstention);
                Ok(AnalysisOutcome::Abstain(abstention))
            }
        }
    }

    async fn candles(&self, pair: &TradingPair, timeframe: Timeframe) -> StageResult<Vec<Candle>> {
        self.market
            .fetch_candles(pair, timeframe, self.fetch.candle_limit)
            .await
            .map_err(|e| {
                Abstention::provider_failure(format!("{} candles for {}: {:#}", timeframe, pair, e))
            })
    }

    /// Candle fetches are required. A news outage degrades to an empty
    /// headline list and therefore a neutral sentiment.
    pub async fn snapshot(
        &self,
        pair: &TradingPair,
        as_of: DateTime<Utc>,
    ) -> StageResult<MarketSnapshot> {
        let (daily, four_hour, one_hour, headlines) = tokio::join!(
            self.candles(pair, Timeframe::Daily),
            self.candles(pair, Timeframe::FourHour),
            self.candles(pair, Timeframe::OneHour),
            self.news.fetch_headlines(&pair.base, self.fetch.headline_limit),
        );

        let headlines = headlines.unwrap_or_else(|e| {
            warn!("News unavailable for {}, scoring as neutral: {:#}", pair.base, e);
            Vec::new()
        });

        let snapshot = MarketSnapshot {
            pair: pair.clone(),
            as_of,
            daily: daily?,
            four_hour: four_hour?,
            one_hour: one_hour?,
            headlines,
        };
        debug!(
            "Snapshot {}: {} daily, {} 4h, {} 1h candles, {} headlines",
            pair,
            snapshot.daily.len(),
            snapshot.four_hour.len(),
            snapshot.one_hour.len(),
            snapshot.headlines.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{headline, long_setup_snapshot};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use common::models::{AbstainKind, Headline, Stage};
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Market {}

        #[async_trait]
        impl MarketDataProvider for Market {
            async fn fetch_candles(
                &self,
                pair: &TradingPair,
                timeframe: Timeframe,
                limit: usize,
            ) -> anyhow::Result<Vec<Candle>>;
        }
    }

    mock! {
        pub News {}

        #[async_trait]
        impl NewsProvider for News {
            async fn fetch_headlines(&self, asset: &str, limit: usize) -> anyhow::Result<Vec<Headline>>;
        }
    }

    fn market_serving(snapshot: &MarketSnapshot, calls: usize) -> MockMarket {
        let snapshot = snapshot.clone();
        let mut market = MockMarket::new();
        market
            .expect_fetch_candles()
            .times(calls)
            .returning(move |_, tf, _| Ok(snapshot.series(tf).to_vec()));
        market
    }

    #[tokio::test]
    async fn analyzes_fetched_snapshot() {
        let expected = long_setup_snapshot();
        let mut news = MockNews::new();
        news.expect_fetch_headlines()
            .with(eq("BTC"), eq(10))
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service =
            StrategyService::new(market_serving(&expected, 3), news, &StrategyConfig::default()).unwrap();
        let outcome = service
            .analyze_at(&expected.pair, 10000.0, expected.as_of)
            .await
            .unwrap();

        let rec = outcome.recommendation().unwrap_or_else(|| panic!("{:?}", outcome));
        assert_eq!(rec.generated_at, expected.as_of);
        assert_eq!(rec.position.position_ratio, 0.03);
    }

    #[tokio::test]
    async fn candle_failure_abstains_at_fetch() {
        let mut market = MockMarket::new();
        market.expect_fetch_candles().returning(|_, tf, _| {
            if tf == Timeframe::FourHour {
                Err(anyhow!("connection reset"))
            } else {
                Ok(Vec::new())
            }
        });
        let mut news = MockNews::new();
        news.expect_fetch_headlines().returning(|_, _| Ok(Vec::new()));

        let service = StrategyService::new(market, news, &StrategyConfig::default()).unwrap();
        let pair = TradingPair::new("ETH", "USDT");
        let outcome = service.analyze(&pair, 5000.0).await.unwrap();

        let abstention = outcome.abstention().unwrap();
        assert_eq!(abstention.stage, Stage::FetchData);
        assert_eq!(abstention.kind, AbstainKind::ProviderFailure);
        assert!(abstention.reasons[0].contains("connection reset"));
        assert!(abstention.reasons[0].contains("4h"));
    }

    #[tokio::test]
    async fn news_failure_degrades_to_neutral() {
        let expected = long_setup_snapshot();
        let mut news = MockNews::new();
        news.expect_fetch_headlines()
            .times(2)
            .returning(|_, _| Err(anyhow!("api key rejected")));

        // one snapshot, then one full analysis
        let service =
            StrategyService::new(market_serving(&expected, 6), news, &StrategyConfig::default()).unwrap();
        let snapshot = service.snapshot(&expected.pair, expected.as_of).await.unwrap();
        assert!(snapshot.headlines.is_empty());

        let outcome = service
            .analyze_at(&expected.pair, 10000.0, expected.as_of)
            .await
            .unwrap();
        assert_eq!(outcome.recommendation().map(|r| r.sentiment_score), Some(0.0));
    }

    #[tokio::test]
    async fn headlines_reach_the_engine() {
        let expected = long_setup_snapshot();
        let as_of = expected.as_of;
        let mut news = MockNews::new();
        news.expect_fetch_headlines()
            .times(1)
            .returning(move |_, _| Ok(vec![headline("Bitcoin rally continues", 1, as_of)]));

        let service =
            StrategyService::new(market_serving(&expected, 3), news, &StrategyConfig::default()).unwrap();
        let outcome = service
            .analyze_at(&expected.pair, 10000.0, as_of)
            .await
            .unwrap();

        let rec = outcome.recommendation().unwrap_or_else(|| panic!("{:?}", outcome));
        // "rally" +1 normalized by 5
        assert_eq!(rec.sentiment_score, 0.2);
        assert_eq!(rec.composite_score, 0.76);
        assert_eq!(rec.position.sentiment_adjustment_pct, 2.0);
        assert!(rec.sentiment_summary.contains("Bitcoin rally continues"));
    }

    #[tokio::test]
    async fn invalid_capital_skips_fetching() {
        let mut market = MockMarket::new();
        market.expect_fetch_candles().times(0);
        let mut news = MockNews::new();
        news.expect_fetch_headlines().times(0);

        let service = StrategyService::new(market, news, &StrategyConfig::default()).unwrap();
        let pair = TradingPair::new("BTC", "USDT");
        let err = service.analyze(&pair, -1.0).await.unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveCapital(-1.0));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = StrategyConfig::default();
        config.indicators.ma_fast = 200;
        let result = StrategyService::new(MockMarket::new(), MockNews::new(), &config);
        assert!(matches!(result, Err(ConfigError::Invariant(_))));
    }
}
