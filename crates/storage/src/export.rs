use common::models::Recommendation;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::StorageError;

/// `strategy_BTC_USDT_20260314_090509.json`, stamped with the generation time.
pub fn file_name(rec: &Recommendation) -> String {
    format!(
        "strategy_{}_{}.json",
        rec.symbol.replace('/', "_"),
        rec.generated_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn write_json(dir: &Path, rec: &Recommendation) -> Result<PathBuf, StorageError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name(rec));
    let body = serde_json::to_string_pretty(rec)?;
    std::fs::write(&path, body)?;
    info!("Recommendation saved to {}", path.display());
    Ok(path)
}
