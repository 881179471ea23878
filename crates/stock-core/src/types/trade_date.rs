//! 거래일 및 날짜별 테이블 이름 규칙.
//!
//! 일별 스냅샷은 `stock_daily_YYYYMMDD` 테이블에 나뉘어 저장됩니다.
//! 날짜가 고정 폭 문자열이므로 테이블 이름의 사전순이 곧 시간순입니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// 일별 스냅샷 테이블 접두사.
pub const SNAPSHOT_TABLE_PREFIX: &str = "stock_daily";

/// `YYYYMMDD` 형식의 거래일.
///
/// 8자리 숫자인지만 검사합니다. 달력상 유효성은 따지지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradeDate(String);

impl TradeDate {
    /// 문자열을 검증하여 거래일을 생성합니다.
    pub fn parse(value: &str) -> CoreResult<Self> {
        if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidTradeDate(value.to_string()))
        }
    }

    /// 날짜 문자열.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 이 날짜의 `<prefix>_YYYYMMDD` 테이블 이름.
    pub fn table_name(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.0)
    }

    /// 이 날짜의 일별 스냅샷 테이블 이름.
    pub fn snapshot_table(&self) -> String {
        self.table_name(SNAPSHOT_TABLE_PREFIX)
    }

    /// `<prefix>_YYYYMMDD` 형식의 테이블 이름에서 거래일을 추출합니다.
    pub fn from_table_name(prefix: &str, table: &str) -> Option<Self> {
        table
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|date| Self::parse(date).ok())
    }
}

/// `<prefix>_` 뒤에 숫자 8자리가 오는 테이블 이름만 매칭하는 SQLite GLOB 패턴.
pub fn dated_table_glob(prefix: &str) -> String {
    format!("{}_{}", prefix, "[0-9]".repeat(8))
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TradeDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TradeDate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TradeDate> for String {
    fn from(date: TradeDate) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let date = TradeDate::parse("20250106").unwrap();
        assert_eq!(date.as_str(), "20250106");
        assert_eq!(date.snapshot_table(), "stock_daily_20250106");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(TradeDate::parse("2025-01-06").is_err());
        assert!(TradeDate::parse("2025010").is_err());
        assert!(TradeDate::parse("202501061").is_err());
        assert!(TradeDate::parse("20250106; DROP TABLE x").is_err());
        assert!(TradeDate::parse("").is_err());
    }

    #[test]
    fn test_from_table_name() {
        let date = TradeDate::from_table_name(SNAPSHOT_TABLE_PREFIX, "stock_daily_20250105").unwrap();
        assert_eq!(date.as_str(), "20250105");
        assert!(TradeDate::from_table_name(SNAPSHOT_TABLE_PREFIX, "stock_daily_backup").is_none());
        assert!(TradeDate::from_table_name(SNAPSHOT_TABLE_PREFIX, "stock_list").is_none());
    }

    #[test]
    fn test_lexicographic_order_is_chronological() {
        let a = TradeDate::parse("20241231").unwrap();
        let b = TradeDate::parse("20250105").unwrap();
        let c = TradeDate::parse("20250106").unwrap();
        assert!(a < b && b < c);
        assert!(a.snapshot_table() < b.snapshot_table());
    }

    #[test]
    fn test_dated_table_glob() {
        assert_eq!(
            dated_table_glob("stock_daily"),
            "stock_daily_[0-9][0-9][0-9][0-9][0-9][0-9][0-9][0-9]"
        );
    }

    #[test]
    fn test_serde_validates() {
        let date: TradeDate = serde_json::from_str("\"20250801\"").unwrap();
        assert_eq!(date.to_string(), "20250801");
        assert!(serde_json::from_str::<TradeDate>("\"yesterday\"").is_err());
    }
}
