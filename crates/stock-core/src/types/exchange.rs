//! 거래소 구분 및 심볼 접두사 규칙.
//!
//! 데이터 소스마다 종목 식별 방식이 다릅니다:
//! - 종목 목록(`stock_list`)과 이력(`stock_history`)은 6자리 순수 코드를 사용
//! - 일별 스냅샷(`stock_daily_*`)과 실시간 시세는 `sh600000`처럼 소문자 거래소 접두사를 붙임
//! - 이력 테이블의 `exchange` 컬럼은 `SH`, `SZ`, `BJ` 대문자 라벨을 저장

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// 중국 본토 증권거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// 상하이 증권거래소
    #[serde(rename = "SH")]
    Shanghai,
    /// 선전 증권거래소
    #[serde(rename = "SZ")]
    Shenzhen,
    /// 베이징 증권거래소
    #[serde(rename = "BJ")]
    Beijing,
}

impl Exchange {
    /// 종목 코드 첫 자리로 상장 거래소를 판별합니다.
    ///
    /// `6` → 상하이, `0`/`3` → 선전, `8`/`4`/`9` → 베이징.
    pub fn from_stock_code(code: &str) -> CoreResult<Self> {
        match code.chars().next() {
            Some('6') => Ok(Exchange::Shanghai),
            Some('0') | Some('3') => Ok(Exchange::Shenzhen),
            Some('8') | Some('4') | Some('9') => Ok(Exchange::Beijing),
            _ => Err(CoreError::InvalidStockCode(code.to_string())),
        }
    }

    /// 스냅샷/시세 심볼에 쓰이는 소문자 접두사.
    pub fn prefix(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "sh",
            Exchange::Shenzhen => "sz",
            Exchange::Beijing => "bj",
        }
    }

    /// 이력 테이블에 저장되는 대문자 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "SH",
            Exchange::Shenzhen => "SZ",
            Exchange::Beijing => "BJ",
        }
    }

    /// 접두사가 붙은 심볼을 만듭니다 (예: `sh600000`).
    pub fn prefixed(&self, code: &str) -> String {
        format!("{}{}", self.prefix(), code)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Exchange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SH" => Ok(Exchange::Shanghai),
            "SZ" => Ok(Exchange::Shenzhen),
            "BJ" => Ok(Exchange::Beijing),
            _ => Err(CoreError::InvalidStockCode(s.to_string())),
        }
    }
}

/// 이력 행의 거래소 라벨과 종목 코드로 스냅샷 테이블의 심볼을 재구성합니다.
///
/// 알 수 없는 라벨은 소문자로 바꿔 그대로 접두사로 사용합니다.
pub fn snapshot_symbol(exchange: &str, stock_code: &str) -> String {
    match exchange.parse::<Exchange>() {
        Ok(ex) => ex.prefixed(stock_code),
        Err(_) => format!("{}{}", exchange.to_lowercase(), stock_code),
    }
}
