//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 요청 사이에 바뀌는 상태는 시가총액 캐시뿐입니다.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use stock_data::MarketCapService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (읽기 전용)
    pub db_pool: SqlitePool,

    /// 캐시를 거치는 실시간 시가총액 조회
    pub market_cap: MarketCapService,

    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, market_cap: MarketCapService) -> Self {
        Self {
            db_pool,
            market_cap,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.db_pool).await.is_ok()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("market_cap", &self.market_cap)
            .field("started_at", &self.started_at)
            .field("version", &self.version)
            .finish()
    }
}

/// 테스트용 상태 생성.
///
/// 빈 인메모리 DB와, 닫힌 포트를 가리키는 시세 소스를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    create_test_state_with_quote_url("http://127.0.0.1:1")
}

/// 지정한 시세 서버를 사용하는 테스트용 상태.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state_with_quote_url(base_url: &str) -> AppState {
    use std::sync::Arc;
    use stock_core::QuoteConfig;
    use stock_data::{QuoteCache, SinaQuoteFetcher, DEFAULT_QUOTE_TTL};

    let pool = crate::db::memory_pool().expect("Failed to create in-memory pool for test");
    let fetcher = SinaQuoteFetcher::new(&QuoteConfig {
        base_url: base_url.to_string(),
        timeout_secs: 2,
        ..Default::default()
    })
    .expect("Failed to create quote fetcher for test");

    let market_cap = MarketCapService::new(Arc::new(fetcher), QuoteCache::new(DEFAULT_QUOTE_TTL));
    AppState::new(pool, market_cap)
}
