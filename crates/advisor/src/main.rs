use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use common::config::StrategyConfig;
use common::logger;
use common::models::TradingPair;
use market_data::{BinanceClient, CryptoCompareClient};
use storage::repositories::RecommendationRepository;
use strategy::StrategyService;

use crate::services::report;
use crate::services::telegram_service::TelegramService;

mod services;

#[derive(Parser, Debug)]
#[command(
    name = "advisor",
    about = "Trade recommendation from daily trend, 4h levels, 1h entries and news sentiment"
)]
struct Args {
    /// Trading pair, e.g. BTC/USDT or ETHUSDT.
    #[arg(long, default_value = "BTC/USDT")]
    symbol: String,

    /// Total account capital in the quote currency.
    #[arg(long, default_value_t = 10_000.0)]
    capital: f64,

    /// Save a produced recommendation as JSON.
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Directory for saved JSON files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Append a produced recommendation to the SQLite journal under WORKDIR.
    #[arg(long, default_value_t = false)]
    journal: bool,

    /// Send the report to Telegram.
    #[arg(long, default_value_t = false)]
    notify: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    let args = Args::parse();
    debug!("{:?}", args);

    let pair: TradingPair = args.symbol.parse()?;
    let config = StrategyConfig::from_env()?;

    let service = StrategyService::new(BinanceClient::new()?, CryptoCompareClient::new()?, &config)?;
    let outcome = service.analyze(&pair, args.capital).await?;

    let text = report::render(&outcome, &pair, args.capital, Utc::now());
    println!("{}", text);

    if args.notify {
        match TelegramService::from_env() {
            Some(telegram) => {
                if let Err(e) = telegram.send(text).await {
                    warn!("Failed to send Telegram message: {:#}", e);
                }
            }
            None => warn!("--notify given but TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID are not set"),
        }
    }

    let Some(rec) = outcome.recommendation() else {
        return Ok(());
    };

    if args.save {
        let path = storage::export::write_json(&args.out_dir, rec)?;
        println!("Saved to {}", path.display());
    }

    if args.journal {
        let workdir = env::var("WORKDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| args.out_dir.clone());
        let pool = storage::db::connect(&workdir)
            .await
            .context("opening recommendation journal")?;
        let id = RecommendationRepository::insert(&pool, rec).await?;
        info!("Journaled recommendation #{}", id);
        pool.close().await;
    }

    Ok(())
}
