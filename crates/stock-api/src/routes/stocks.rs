//! 종목 목록/조회/검색 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/stocks` - 최신 스냅샷 필드가 붙은 종목 목록
//! - `GET /api/stocks/{symbol}` - 종목 조회
//! - `GET /api/search` - 이름/코드/병음 부분 일치 검색

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use stock_core::{Instrument, InstrumentWithQuote, SNAPSHOT_TABLE_PREFIX};

use super::non_negative;
use crate::error::{bad_request, db_error, not_found, ApiQuery, ApiResult};
use crate::repository::{CatalogRepository, SnapshotRepository};
use crate::state::AppState;

// ==================== Request/Response 타입 ====================

/// 페이지 쿼리.
#[derive(Debug, Deserialize)]
pub struct StocksQuery {
    #[serde(default = "default_stocks_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_stocks_limit() -> i64 {
    10
}

/// 종목 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct StocksResponse {
    /// 전체 종목 수
    pub total: i64,
    pub count: usize,
    pub stocks: Vec<InstrumentWithQuote>,
}

/// 검색 쿼리.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 {
    20
}

/// 검색 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub stocks: Vec<Instrument>,
}

// ==================== 핸들러 ====================

/// GET /api/stocks
pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<StocksQuery>,
) -> ApiResult<Json<StocksResponse>> {
    let pool = &state.db_pool;

    let latest = CatalogRepository::find_latest_table(pool, SNAPSHOT_TABLE_PREFIX)
        .await
        .map_err(|e| db_error("find_latest_table", e))?;
    debug!(table = ?latest, "Joining stock list with snapshot");

    let stocks = SnapshotRepository::list_instruments(
        pool,
        latest.as_deref(),
        non_negative(query.limit),
        non_negative(query.offset),
    )
    .await
    .map_err(|e| db_error("list_instruments", e))?;

    let total = SnapshotRepository::count_instruments(pool)
        .await
        .map_err(|e| db_error("count_instruments", e))?;

    Ok(Json(StocksResponse {
        total,
        count: stocks.len(),
        stocks,
    }))
}

/// GET /api/stocks/{symbol}
pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Instrument>> {
    SnapshotRepository::get_instrument(&state.db_pool, &symbol)
        .await
        .map_err(|e| db_error("get_instrument", e))?
        .map(Json)
        .ok_or_else(|| not_found("Stock not found"))
}

/// GET /api/search
pub async fn search_stocks(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    if query.q.is_empty() {
        return Err(bad_request("Query parameter 'q' is required"));
    }

    let stocks = SnapshotRepository::search(&state.db_pool, &query.q, non_negative(query.limit))
        .await
        .map_err(|e| db_error("search_instruments", e))?;

    Ok(Json(SearchResponse {
        query: query.q,
        count: stocks.len(),
        stocks,
    }))
}

/// 종목 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/stocks/{symbol}", get(get_stock))
        .route("/search", get(search_stocks))
}
