//! 캐싱 레이어.
//!
//! - Quote 캐시: 실시간 시가총액 조회 결과 (TTL 5분)

pub mod quote;

pub use quote::{Clock, ManualClock, QuoteCache, SystemClock, DEFAULT_QUOTE_TTL};
