//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크
//! - `/api` - 엔드포인트 목록
//! - `/api/tables`, `/api/stats` - 카탈로그와 시장 통계
//! - `/api/stocks`, `/api/search` - 종목 목록/조회/검색
//! - `/api/daily/{date}` - 일별 스냅샷과 등락 순위
//! - `/api/query` - 임의 SELECT
//! - `/api/history` - 일봉 이력과 이력 기반 등락 순위
//! - `/api/filter/stocks` - 다일 등락률 필터
//! - `/api/realtime/mktcap/{stock_code}` - 실시간 시가총액
//! - `/api/strategy/scan` - 거래량 급증 전략 스캔

pub mod catalog;
pub mod daily;
pub mod filter;
pub mod health;
pub mod history;
pub mod home;
pub mod query;
pub mod realtime;
pub mod stocks;
pub mod strategy;

pub use catalog::{catalog_router, TablesResponse};
pub use daily::{daily_router, DailyResponse};
pub use filter::{filter_router, FilterQuery, FilterResponse};
pub use health::{health_router, HealthResponse};
pub use history::{history_router, AvailableDatesResponse, HistoryResponse};
pub use home::IndexResponse;
pub use query::{query_router, QueryResponse};
pub use realtime::realtime_router;
pub use stocks::{stocks_router, SearchResponse, StocksResponse};
pub use strategy::{strategy_router, StrategyQuery, StrategyResponse};

use axum::{http::StatusCode, middleware, routing::get, Router};
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use stock_core::MoverDirection;

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let api_router = Router::new()
        .route("/", get(home::index))
        .merge(catalog_router())
        .merge(stocks_router())
        .merge(query_router())
        .nest("/daily", daily_router())
        .nest("/history", history_router())
        .nest("/filter", filter_router())
        .nest("/realtime", realtime_router())
        .nest("/strategy", strategy_router());

    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        .nest("/api", api_router)
}

/// 미들웨어까지 적용된 애플리케이션 라우터.
pub fn create_app(state: Arc<AppState>, request_timeout: Duration) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(cors_middleware))
}

/// 등락 순위 응답.
///
/// 결과 배열의 키는 방향에 따라 `top_gainers` 또는 `top_losers`입니다.
#[derive(Debug)]
pub struct MoversResponse<T> {
    pub date: String,
    pub direction: MoverDirection,
    pub movers: Vec<T>,
}

impl<T: Serialize> Serialize for MoversResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("count", &self.movers.len())?;
        map.serialize_entry(self.direction.response_key(), &self.movers)?;
        map.end()
    }
}

/// 음수 limit/offset은 0으로 고정합니다.
pub(crate) fn non_negative(value: i64) -> i64 {
    value.max(0)
}
