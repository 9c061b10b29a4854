use chrono::DateTime;
use common::models::Candle;
use serde::Deserialize;

use crate::remote::RemoteError;
use crate::traits::{RemoteResponse, parse_decimal};

/// One row of `GET /fapi/v1/klines`. Binance encodes each kline as a
/// positional array with decimals as strings.
#[derive(Deserialize, Debug)]
pub struct KlineRow(
    pub i64,    // open time (ms)
    pub String, // open
    pub String, // high
    pub String, // low
    pub String, // close
    pub String, // volume
    pub i64,    // close time (ms)
    pub String, // quote asset volume
    pub u64,    // number of trades
    pub String, // taker buy base volume
    pub String, // taker buy quote volume
    pub String, // ignore
);

impl RemoteResponse<Candle> for KlineRow {
    fn to_model(&self) -> Result<Candle, RemoteError> {
        let open_time = DateTime::from_timestamp_millis(self.0).ok_or(RemoteError::Malformed {
            field: "open_time",
            value: self.0.to_string(),
        })?;

        Ok(Candle::new(
            open_time,
            parse_decimal("open", &self.1)?,
            parse_decimal("high", &self.2)?,
            parse_decimal("low", &self.3)?,
            parse_decimal("close", &self.4)?,
            parse_decimal("volume", &self.5)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        [1768867200000, "101250.10", "102000.00", "100900.50", "101800.00", "8123.456",
         1768953599999, "826000000.1", 1523000, "4000.1", "407000000.2", "0"],
        [1768953600000, "101800.00", "103500.00", "101700.00", "103100.25", "9001.5",
         1769039999999, "921000000.0", 1611000, "4500.0", "460000000.0", "0"]
    ]"#;

    #[test]
    fn decodes_positional_rows() {
        let rows: Vec<KlineRow> = serde_json::from_str(PAYLOAD).unwrap();
        let candles: Vec<Candle> = rows.iter().map(|r| r.to_model().unwrap()).collect();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open, 101250.10);
        assert_eq!(candles[1].close, 103100.25);
        assert_eq!(candles[1].volume, 9001.5);
        assert_eq!(candles[0].open_time.timestamp_millis(), 1768867200000);
        assert!(candles[0].indicators.ma_fast.is_none());
    }

    #[test]
    fn rejects_non_numeric_price() {
        let row = KlineRow(
            0,
            "abc".into(),
            "1".into(),
            "1".into(),
            "1".into(),
            "1".into(),
            0,
            "0".into(),
            0,
            "0".into(),
            "0".into(),
            "0".into(),
        );
        let err = row.to_model().unwrap_err();
        assert!(matches!(err, RemoteError::Malformed { field: "open", .. }));
    }
}
