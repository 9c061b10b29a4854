pub mod engine;
pub mod entry;
pub mod indicators;
pub mod levels;
pub mod patterns;
pub mod risk;
pub mod sentiment;
pub mod services;
pub mod trend;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::SignalEngine;
pub use services::strategy_service::StrategyService;
