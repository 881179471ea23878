//! 실시간 시세 Provider 모듈.
//!
//! ## Sina 금융
//! - `SinaQuoteFetcher`: `hq.sinajs.cn` 실시간 시세에서 현재가와 총 주식수를 읽어
//!   시가총액을 계산합니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod sina;

pub use sina::{parse_quote_payload, SinaQuoteFetcher};

/// 실시간 시세에서 계산한 시가총액.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketCapQuote {
    /// 현재가 (위안)
    pub price: f64,
    /// 총 주식수 (만 주)
    pub total_shares_wan: f64,
    /// 시가총액 (만 위안)
    pub mktcap_wan: f64,
}

/// 종목 코드로 실시간 시가총액을 가져오는 소스.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 6자리 종목 코드의 시가총액을 조회합니다.
    async fn fetch_market_cap(&self, stock_code: &str) -> Result<MarketCapQuote>;
}
