//! 舊版掃描 CSV 讀取器
//!
//! 只取 `item_id, price, quantity, timestamp` 四欄，其他欄位忽略。
//! 空白或 NaN 視為缺值，交給預處理移除。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::{IngestError, IngestResult};
use super::preprocess::{RawObservation, MISSING_VALUE_TOKENS};

/// 必要欄位
pub const REQUIRED_COLUMNS: [&str; 4] = ["item_id", "price", "quantity", "timestamp"];

/// 讀取器配置
#[derive(Debug, Clone)]
pub struct LegacyCsvReaderConfig {
    /// 分隔符
    pub delimiter: u8,
    /// 是否去除欄位前後空白
    pub trim: bool,
}

impl Default for LegacyCsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

/// 舊版掃描 CSV 讀取器
#[derive(Debug, Clone, Default)]
pub struct LegacyCsvReader {
    config: LegacyCsvReaderConfig,
}

impl LegacyCsvReader {
    pub fn new(config: LegacyCsvReaderConfig) -> Self {
        Self { config }
    }

    /// 設定分隔符
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    /// 從檔案路徑讀取
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> IngestResult<Vec<RawObservation>> {
        let file = File::open(path.as_ref())?;
        self.read_from(file)
    }

    /// 從字串讀取
    pub fn read_str(&self, data: &str) -> IngestResult<Vec<RawObservation>> {
        self.read_from(data.as_bytes())
    }

    fn read_from<R: Read>(&self, source: R) -> IngestResult<Vec<RawObservation>> {
        let trim = if self.config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .trim(trim)
            // 欄位數不足的列視為缺值，而不是解析錯誤
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let mut positions = [0usize; 4];
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))?;
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let field = |index: usize| {
                parse_integer(record.get(positions[index]), REQUIRED_COLUMNS[index], line)
            };

            rows.push(RawObservation {
                item_id: field(0)?,
                price: field(1)?,
                quantity: field(2)?,
                timestamp: field(3)?,
            });
        }

        Ok(rows)
    }
}

/// 解析整數欄位；接受 `1000.0` 這類整數值浮點表示
fn parse_integer(raw: Option<&str>, column: &str, line: u64) -> IngestResult<Option<i64>> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    if MISSING_VALUE_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(value))
    {
        return Ok(None);
    }

    if let Ok(parsed) = value.parse::<i64>() {
        return Ok(Some(parsed));
    }

    match value.parse::<f64>() {
        // i64::MAX 轉成 f64 會進位成 2^63，因此上界用嚴格小於
        Ok(parsed)
            if parsed.is_finite()
                && parsed.fract() == 0.0
                && parsed >= i64::MIN as f64
                && parsed < i64::MAX as f64 =>
        {
            Ok(Some(parsed as i64))
        }
        _ => Err(IngestError::InvalidValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
