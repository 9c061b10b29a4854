use common::models::Recommendation;
use sqlx::SqlitePool;

use crate::StorageError;

pub struct RecommendationRepository;

impl RecommendationRepository {
    pub async fn insert(pool: &SqlitePool, rec: &Recommendation) -> Result<i64, StorageError> {
        let payload = serde_json::to_string(rec)?;

        let result = sqlx::query(
            r#"
                INSERT INTO recommendations (
                    symbol, direction, entry_price, current_price, stop_loss,
                    take_profit_1, take_profit_2, position_ratio, sentiment_score,
                    composite_score, generated_at, payload
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rec.symbol)
        .bind(rec.direction.as_str())
        .bind(rec.entry_price)
        .bind(rec.current_price)
        .bind(rec.stop_loss)
        .bind(rec.take_profit_1)
        .bind(rec.take_profit_2)
        .bind(rec.position.position_ratio)
        .bind(rec.sentiment_score)
        .bind(rec.composite_score)
        .bind(rec.generated_at.timestamp_millis())
        .bind(payload)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn recent(
        pool: &SqlitePool,
        symbol: &str,
        limit: u32,
    ) -> Result<Vec<Recommendation>, StorageError> {
        let rows: Vec<String> = sqlx::query_scalar(
            r#"
                SELECT payload FROM recommendations
                WHERE symbol = ?
                ORDER BY generated_at DESC, id DESC
                LIMIT ?
            "#,
        )
        .bind(symbol)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        rows.iter()
            .map(|payload| serde_json::from_str(payload).map_err(StorageError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::fixtures::recommendation;

    #[tokio::test]
    async fn recent_returns_newest_first_per_symbol() {
        let pool = connect_in_memory().await.unwrap();
        for (symbol, hour) in [("BTC/USDT", 8), ("BTC/USDT", 10), ("ETH/USDT", 11), ("BTC/USDT", 9)] {
            RecommendationRepository::insert(&pool, &recommendation(symbol, hour))
                .await
                .unwrap();
        }

        let btc = RecommendationRepository::recent(&pool, "BTC/USDT", 2).await.unwrap();
        let hours: Vec<u32> = btc
            .iter()
            .map(|r| chrono::Timelike::hour(&r.generated_at))
            .collect();
        assert_eq!(hours, vec![10, 9]);
        assert!(btc.iter().all(|r| r.symbol == "BTC/USDT"));
    }

    #[tokio::test]
    async fn insert_preserves_full_record() {
        let pool = connect_in_memory().await.unwrap();
        let rec = recommendation("SOL/USDT", 12);
        let id = RecommendationRepository::insert(&pool, &rec).await.unwrap();
        assert!(id > 0);

        let stored = RecommendationRepository::recent(&pool, "SOL/USDT", 10).await.unwrap();
        assert_eq!(stored, vec![rec]);
    }
}
