//! 종목 기준 정보.

use serde::{Deserialize, Serialize};

/// 종목 목록(`stock_list`)의 한 행.
///
/// `symbol`은 거래소 접두사가 없는 6자리 코드이며 목록 안에서 유일합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct Instrument {
    /// 거래소 한정 코드 (예: `600000.SH`)
    pub ts_code: String,
    /// 순수 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 지역
    pub area: String,
    /// 업종
    pub industry: String,
    /// 상장일
    pub list_date: String,
    /// 병음 검색 키
    pub pinyin: String,
}

/// 최신 스냅샷 필드가 붙은 종목.
///
/// 스냅샷 테이블이 없거나 매칭되는 행이 없으면 시세 필드는 `null`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct InstrumentWithQuote {
    pub ts_code: String,
    pub symbol: String,
    pub name: String,
    pub pinyin: String,
    /// 현재가
    pub trade: Option<f64>,
    /// 등락률 (%)
    pub changepercent: Option<f64>,
    /// 시가총액 (만 위안)
    pub mktcap: Option<f64>,
    /// 회전율 (%)
    pub turnoverratio: Option<f64>,
}
