//! 일별 스냅샷 행과 카탈로그 정보.

use serde::{Deserialize, Serialize};

/// `stock_daily_YYYYMMDD` 테이블의 한 행.
///
/// `symbol`은 거래소 접두사가 붙은 형태(`sh600000`)입니다.
/// 같은 종목이 재수집으로 여러 번 들어 있을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct DailySnapshot {
    pub symbol: String,
    pub code: i64,
    pub name: String,
    /// 현재가
    pub trade: f64,
    pub pricechange: f64,
    pub changepercent: f64,
    pub buy: f64,
    pub sell: f64,
    /// 전일 종가
    pub settlement: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub amount: i64,
    pub ticktime: String,
    /// PER
    pub per: f64,
    /// PBR
    pub pb: f64,
    /// 총 시가총액 (만 위안)
    pub mktcap: f64,
    /// 유통 시가총액 (만 위안)
    pub nmc: f64,
    pub turnoverratio: f64,
    pub dump_time: String,
}

/// 스냅샷 테이블에서 조회한 회전율과 시가총액.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct SnapshotMetrics {
    pub turnover_ratio: f64,
    /// 만 위안
    pub mktcap: f64,
}

/// 데이터베이스 카탈로그 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct TableInfo {
    pub name: String,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "type"))]
    pub table_type: String,
}

/// 시장 통계 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    pub total_stocks: i64,
    pub gainers: i64,
    pub losers: i64,
    pub tables: i64,
    /// 요청에 지정된 날짜 (없으면 빈 문자열)
    pub date: String,
}
