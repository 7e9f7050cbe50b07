use std::fmt::Display;

use thiserror::Error;

/// 配置驗證錯誤
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("缺少必要配置項: {0}")]
    MissingField(String),

    #[error("{field} 的值無效: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{field} 的值 {value} 不在範圍 {min}..={max} 內")]
    RangeError {
        field: String,
        value: String,
        min: String,
        max: String,
    },
}

impl ValidationError {
    /// 出錯的配置鍵
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField(field)
            | ValidationError::InvalidValue { field, .. }
            | ValidationError::RangeError { field, .. } => field,
        }
    }
}

/// 可自我驗證的配置區段
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 各配置區段共用的檢查
pub struct ValidationUtils;

impl ValidationUtils {
    /// 閉區間檢查
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + Display,
    {
        if value >= min && value <= max {
            return Ok(());
        }
        Err(ValidationError::RangeError {
            field: field.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        })
    }

    /// 不分大小寫比對允許值
    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), ValidationError> {
        if allowed.iter().any(|option| option.eq_ignore_ascii_case(value)) {
            return Ok(());
        }
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} 不在 {} 之中", value, allowed.join("/")),
        })
    }

    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::MissingField(field.to_string()))
        } else {
            Ok(())
        }
    }

    /// 非空且不以路徑分隔符結尾
    pub fn file_path(value: &str, field: &str) -> Result<(), ValidationError> {
        Self::not_empty(value, field)?;
        if value.ends_with(['/', '\\']) {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                reason: format!("{} 是目錄而不是檔案", value),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_in_range_reports_bounds() {
        assert!(ValidationUtils::in_range(5, 1, 10, "pool").is_ok());
        assert!(ValidationUtils::in_range(10, 1, 10, "pool").is_ok());

        let err = ValidationUtils::in_range(15, 1, 10, "pool").unwrap_err();
        assert_eq!(
            err,
            ValidationError::RangeError {
                field: "pool".to_string(),
                value: "15".to_string(),
                min: "1".to_string(),
                max: "10".to_string(),
            }
        );
        assert_eq!(err.field(), "pool");
    }

    #[rstest]
    #[case("info", true)]
    #[case("INFO", true)]
    #[case("verbose", false)]
    fn test_one_of(#[case] value: &str, #[case] ok: bool) {
        let result = ValidationUtils::one_of(value, &["info", "debug"], "log.level");
        assert_eq!(result.is_ok(), ok);
    }

    #[rstest]
    #[case("goblin_ai.db", true)]
    #[case("data/", false)]
    #[case("data\\", false)]
    #[case("   ", false)]
    fn test_file_path(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(ValidationUtils::file_path(value, "database.path").is_ok(), ok);
    }
}
