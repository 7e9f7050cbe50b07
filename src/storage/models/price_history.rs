use serde::{Deserialize, Serialize};

/// 單筆拍賣行價格觀測（插入模型，不包含自動生成的序號）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub item_id: i64,
    /// 價格，以最小貨幣單位（銅幣）計
    pub price: i64,
    pub quantity: i64,
    /// Unix 秒
    pub timestamp: i64,
}

impl PriceObservation {
    pub fn new(item_id: i64, price: i64, quantity: i64, timestamp: i64) -> Self {
        Self {
            item_id,
            price,
            quantity,
            timestamp,
        }
    }
}

/// 已寫入 price_history 的觀測
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredObservation {
    pub id: i64,
    pub item_id: i64,
    pub price: i64,
    pub quantity: i64,
    pub timestamp: i64,
}

impl StoredObservation {
    /// 去掉序號，取回原始觀測
    pub fn observation(&self) -> PriceObservation {
        PriceObservation::new(self.item_id, self.price, self.quantity, self.timestamp)
    }
}
