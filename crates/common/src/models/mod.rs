pub mod candle;
pub mod headline;
pub mod pair;
pub mod recommendation;
pub mod sentiment;
pub mod signal;

pub use candle::{Candle, Indicators, Timeframe};
pub use headline::Headline;
pub use pair::TradingPair;
pub use recommendation::{
    AbstainKind, Abstention, AnalysisOutcome, MarketSnapshot, Recommendation, Stage, StageResult,
};
pub use sentiment::{HeadlineContribution, SentimentLabel, SentimentResult};
pub use signal::{
    AnchorLevel, Direction, EntryCheck, EntryCondition, EntryDecision, PositionPlan, Regime,
    TrendSignal,
};
