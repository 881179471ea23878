//! 일봉 이력 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/history/{stock_code}` - 최신순 이력 페이지
//! - `GET /api/history/{stock_code}/range` - 기간 이력 (오래된 순)
//! - `GET /api/history/gainers/{date}` - 이력 기반 상승률 상위
//! - `GET /api/history/losers/{date}` - 이력 기반 하락률 상위
//! - `GET /api/history/dates/available` - 스냅샷 테이블이 있는 거래일

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stock_core::{HistoricalMover, HistoryBar, MoverDirection, TradeDate, SNAPSHOT_TABLE_PREFIX};

use super::{non_negative, MoversResponse};
use crate::error::{bad_request, core_error, db_error, ApiQuery, ApiResult};
use crate::repository::{CatalogRepository, HistoryRepository, MoversRepository};
use crate::state::AppState;

// ==================== Request/Response 타입 ====================

/// 이력 페이지 쿼리.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_history_limit() -> i64 {
    60
}

/// 이력 페이지 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub stock_code: String,
    /// 종목의 전체 이력 행 수
    pub total: i64,
    pub count: usize,
    pub data: Vec<HistoryBar>,
}

/// 기간 쿼리 (YYYYMMDD).
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// 기간 이력 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryRangeResponse {
    pub stock_code: String,
    pub start_date: String,
    pub end_date: String,
    pub count: usize,
    pub data: Vec<HistoryBar>,
}

/// 등락 순위 쿼리.
#[derive(Debug, Deserialize)]
pub struct MoversQuery {
    #[serde(default = "default_movers_limit")]
    pub limit: i64,
}

fn default_movers_limit() -> i64 {
    10
}

/// 거래일 목록 쿼리.
#[derive(Debug, Deserialize)]
pub struct AvailableDatesQuery {
    #[serde(default = "default_dates_limit")]
    pub limit: i64,
}

fn default_dates_limit() -> i64 {
    7
}

/// 거래일 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailableDatesResponse {
    pub count: usize,
    pub dates: Vec<String>,
}

// ==================== 핸들러 ====================

/// GET /api/history/{stock_code}
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(stock_code): Path<String>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let pool = &state.db_pool;

    let data = HistoryRepository::get_history(
        pool,
        &stock_code,
        non_negative(query.limit),
        non_negative(query.offset),
    )
    .await
    .map_err(|e| db_error("history_page", e))?;

    let total = HistoryRepository::count_history(pool, &stock_code)
        .await
        .map_err(|e| db_error("count_history", e))?;

    Ok(Json(HistoryResponse {
        stock_code,
        total,
        count: data.len(),
        data,
    }))
}

/// GET /api/history/{stock_code}/range
///
/// 두 날짜 모두 `YYYYMMDD`이고 `start <= end`여야 합니다.
pub async fn get_history_range(
    State(state): State<Arc<AppState>>,
    Path(stock_code): Path<String>,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> ApiResult<Json<HistoryRangeResponse>> {
    if query.start.is_empty() || query.end.is_empty() {
        return Err(bad_request(
            "Both 'start' and 'end' query parameters are required (format: YYYYMMDD)",
        ));
    }

    let start = TradeDate::parse(&query.start).map_err(|e| core_error(&e))?;
    let end = TradeDate::parse(&query.end).map_err(|e| core_error(&e))?;
    if start > end {
        return Err(bad_request("'start' must not be after 'end'"));
    }

    let data =
        HistoryRepository::get_history_range(&state.db_pool, &stock_code, start.as_str(), end.as_str())
            .await
            .map_err(|e| db_error("history_range", e))?;

    Ok(Json(HistoryRangeResponse {
        stock_code,
        start_date: query.start,
        end_date: query.end,
        count: data.len(),
        data,
    }))
}

async fn historical_movers(
    state: &AppState,
    date: String,
    limit: i64,
    direction: MoverDirection,
) -> ApiResult<Json<MoversResponse<HistoricalMover>>> {
    let movers = MoversRepository::top_movers(&state.db_pool, &date, non_negative(limit), direction)
        .await
        .map_err(|e| db_error("historical_movers", e))?;

    Ok(Json(MoversResponse {
        date,
        direction,
        movers,
    }))
}

/// GET /api/history/gainers/{date}
pub async fn get_historical_gainers(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    ApiQuery(query): ApiQuery<MoversQuery>,
) -> ApiResult<Json<MoversResponse<HistoricalMover>>> {
    historical_movers(&state, date, query.limit, MoverDirection::Gainers).await
}

/// GET /api/history/losers/{date}
pub async fn get_historical_losers(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    ApiQuery(query): ApiQuery<MoversQuery>,
) -> ApiResult<Json<MoversResponse<HistoricalMover>>> {
    historical_movers(&state, date, query.limit, MoverDirection::Losers).await
}

/// GET /api/history/dates/available
pub async fn get_available_dates(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<AvailableDatesQuery>,
) -> ApiResult<Json<AvailableDatesResponse>> {
    let dates = CatalogRepository::list_trailing_dates(
        &state.db_pool,
        SNAPSHOT_TABLE_PREFIX,
        non_negative(query.limit),
    )
    .await
    .map_err(|e| db_error("list_trailing_dates", e))?;

    Ok(Json(AvailableDatesResponse {
        count: dates.len(),
        dates,
    }))
}

/// 이력 라우터 생성.
pub fn history_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{stock_code}", get(get_history))
        .route("/{stock_code}/range", get(get_history_range))
        .route("/gainers/{date}", get(get_historical_gainers))
        .route("/losers/{date}", get(get_historical_losers))
        .route("/dates/available", get(get_available_dates))
}
