//! 종목별 일봉 이력과 단일 거래일 등락 종목.

use serde::{Deserialize, Serialize};

/// `stock_history` 테이블의 한 행.
///
/// (종목 코드, 거래일) 조합이 유일하며 등락률 컬럼은 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct HistoryBar {
    pub id: i64,
    pub stock_code: String,
    pub stock_name: String,
    /// 거래소 라벨 (`SH`, `SZ`, `BJ`)
    pub exchange: String,
    pub trade_date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub amount: f64,
    pub import_time: String,
}

/// 직전 거래일 종가 대비 등락이 계산된 이력 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct HistoricalMover {
    pub stock_code: String,
    pub stock_name: String,
    pub exchange: String,
    pub trade_date: String,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: i64,
    pub amount: f64,
    /// 직전 거래일 종가. 이전 행이 없으면 당일 시가
    pub prev_close: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// 등락 순위 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoverDirection {
    /// 상승률 상위
    Gainers,
    /// 하락률 상위
    Losers,
}

impl MoverDirection {
    /// 등락률 정렬 방향 SQL 키워드.
    pub fn sort_order(&self) -> &'static str {
        match self {
            MoverDirection::Gainers => "DESC",
            MoverDirection::Losers => "ASC",
        }
    }

    /// 응답 본문에서 결과 배열의 키.
    pub fn response_key(&self) -> &'static str {
        match self {
            MoverDirection::Gainers => "top_gainers",
            MoverDirection::Losers => "top_losers",
        }
    }
}
