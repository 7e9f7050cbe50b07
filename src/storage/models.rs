pub mod prediction;
pub mod price_history;

// 重新匯出常用模型類型
pub use prediction::{Prediction, StoredPrediction};
pub use price_history::{PriceObservation, StoredObservation};
