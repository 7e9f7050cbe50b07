//! 資料預處理
//!
//! 訓練或寫入前移除欄位不完整的列。兩個函數都是純函數，保留原始順序。

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::storage::models::PriceObservation;

/// 視為缺值的儲存格寫法
///
/// 讀取 CSV 時原樣比對；舊版 CSV 讀取器另外不分大小寫比對。
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "NA", "N/A", "NaN", "nan", "NAN", "null", "NULL", "Null", "None", "none",
];

/// 尚未清理的掃描記錄，任何欄位都可能缺值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub item_id: Option<i64>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub timestamp: Option<i64>,
}

impl RawObservation {
    /// 所有欄位齊全時轉成觀測
    pub fn complete(&self) -> Option<PriceObservation> {
        Some(PriceObservation::new(
            self.item_id?,
            self.price?,
            self.quantity?,
            self.timestamp?,
        ))
    }
}

impl From<PriceObservation> for RawObservation {
    fn from(observation: PriceObservation) -> Self {
        Self {
            item_id: Some(observation.item_id),
            price: Some(observation.price),
            quantity: Some(observation.quantity),
            timestamp: Some(observation.timestamp),
        }
    }
}

/// 移除任何欄位缺值的掃描記錄
pub fn clean_observations<I>(batch: I) -> Vec<PriceObservation>
where
    I: IntoIterator<Item = RawObservation>,
{
    let mut dropped = 0usize;
    let cleaned: Vec<PriceObservation> = batch
        .into_iter()
        .filter_map(|raw| {
            let complete = raw.complete();
            if complete.is_none() {
                dropped += 1;
            }
            complete
        })
        .collect();

    debug!("預處理保留 {} 筆，移除 {} 筆不完整記錄", cleaned.len(), dropped);
    cleaned
}

/// 移除任何欄位為 null 或 NaN 的列
pub fn clean_frame(df: &DataFrame) -> PolarsResult<DataFrame> {
    let cleaned = nan_to_null(df)?.drop_nulls::<String>(None)?;
    debug!(
        "預處理保留 {} 列，移除 {} 列不完整資料",
        cleaned.height(),
        df.height() - cleaned.height()
    );
    Ok(cleaned)
}

/// 浮點欄位中的 NaN 轉成 null，其他欄位不動
fn nan_to_null(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut converted = df.clone();
    for column in df.get_columns() {
        if !column.dtype().is_float() {
            continue;
        }

        let series = column.as_materialized_series().cast(&DataType::Float64)?;
        let values: Float64Chunked = series
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();
        converted.with_column(values.with_name(column.name().clone()).into_series())?;
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_observations_drops_incomplete() {
        let batch = vec![
            RawObservation::from(PriceObservation::new(123, 1000, 10, 1_700_000_000)),
            RawObservation {
                item_id: Some(456),
                price: None,
                quantity: Some(5),
                timestamp: Some(1_700_000_000),
            },
            RawObservation::from(PriceObservation::new(789, 5000, 1, 1_700_000_060)),
        ];

        let cleaned = clean_observations(batch);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].item_id, 123);
        assert_eq!(cleaned[1].item_id, 789);
    }

    #[test]
    fn test_clean_observations_empty_batch() {
        assert!(clean_observations(Vec::new()).is_empty());
        assert!(clean_observations(vec![RawObservation::default()]).is_empty());
    }

    #[test]
    fn test_clean_frame_drops_rows_with_nulls() {
        let df = df![
            "x" => [Some(1.0), None, Some(3.0)],
            "target" => [Some(5.0), Some(7.0), Some(9.0)],
        ]
        .unwrap();

        let cleaned = clean_frame(&df).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(cleaned.width(), 2);
        // 輸入不被修改
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn test_clean_frame_drops_nan_rows() {
        let df = df![
            "x" => [1.0, f64::NAN, 3.0],
            "quantity" => [1i64, 2, 3],
            "target" => [5.0, 7.0, 9.0],
        ]
        .unwrap();

        let cleaned = clean_frame(&df).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(cleaned.width(), 3);
        let x: Vec<Option<f64>> = cleaned
            .column("x")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(x, vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn test_clean_frame_keeps_complete_frame() {
        let df = df![
            "x" => [1.0, 2.0],
            "target" => [5.0, 7.0],
        ]
        .unwrap();

        assert_eq!(clean_frame(&df).unwrap().height(), 2);
    }
}
