//! 캐시를 거치는 실시간 시가총액 조회.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use stock_core::wan_to_yi;

use crate::cache::QuoteCache;
use crate::error::Result;
use crate::provider::QuoteSource;

/// 시가총액 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCapLookup {
    pub stock_code: String,
    /// 만 위안
    pub mktcap: f64,
    /// 억 위안
    pub mktcap_yi: f64,
    /// 캐시에서 응답했는지 여부
    pub cached: bool,
}

impl MarketCapLookup {
    fn new(stock_code: &str, mktcap: f64, cached: bool) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            mktcap,
            mktcap_yi: wan_to_yi(mktcap),
            cached,
        }
    }
}

/// 캐시 우선 시가총액 서비스.
///
/// 캐시 미스일 때만 외부 소스를 호출하고, 성공한 값만 캐시에 기록합니다.
/// 실패 시 만료된 값으로 대체하지 않습니다.
#[derive(Clone)]
pub struct MarketCapService {
    source: Arc<dyn QuoteSource>,
    cache: QuoteCache,
}

impl MarketCapService {
    pub fn new(source: Arc<dyn QuoteSource>, cache: QuoteCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// 종목의 시가총액을 조회합니다.
    pub async fn market_cap(&self, stock_code: &str) -> Result<MarketCapLookup> {
        if let Some(mktcap) = self.cache.get(stock_code).await {
            debug!(stock_code, mktcap, "Market cap cache hit");
            return Ok(MarketCapLookup::new(stock_code, mktcap, true));
        }

        let quote = self.source.fetch_market_cap(stock_code).await?;
        self.cache.put(stock_code, quote.mktcap_wan).await;

        info!(
            stock_code,
            source = self.source.name(),
            mktcap_yi = wan_to_yi(quote.mktcap_wan),
            "Market cap fetched"
        );

        Ok(MarketCapLookup::new(stock_code, quote.mktcap_wan, false))
    }
}

impl std::fmt::Debug for MarketCapService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketCapService")
            .field("source", &self.source.name())
            .field("cache", &self.cache)
            .finish()
    }
}
