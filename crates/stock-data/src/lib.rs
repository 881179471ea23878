//! 외부 시세 소스와 캐시.
//!
//! 이 crate는 다음을 제공합니다:
//! - Sina 실시간 시세 조회 및 응답 파싱
//! - 시가총액 TTL 캐시 (주입 가능한 시계)
//! - 캐시 우선 시가총액 서비스

pub mod cache;
pub mod error;
pub mod provider;
pub mod service;

pub use cache::{Clock, ManualClock, QuoteCache, SystemClock, DEFAULT_QUOTE_TTL};
pub use error::{QuoteError, Result};
pub use provider::{parse_quote_payload, MarketCapQuote, QuoteSource, SinaQuoteFetcher};
pub use service::{MarketCapLookup, MarketCapService};
