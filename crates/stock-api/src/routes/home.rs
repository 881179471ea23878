//! API 인덱스 문서.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 제공하는 엔드포인트 목록.
const ENDPOINTS: &[&str] = &[
    "GET /api/tables - List all tables",
    "GET /api/stats?date=YYYYMMDD - Market statistics",
    "GET /api/stocks?limit=10&offset=0 - Get stock list",
    "GET /api/stocks/{symbol} - Get stock by symbol",
    "GET /api/daily/{date}?limit=10&offset=0 - Get daily data",
    "GET /api/daily/{date}/top?limit=10 - Get top gainers",
    "GET /api/daily/{date}/bottom?limit=10 - Get top losers",
    "GET /api/search?q=keyword&limit=20 - Search stocks",
    "GET /api/query?sql=SELECT...&limit=100 - Custom SQL query",
    "GET /api/history/{stock_code}?limit=60&offset=0 - Get stock history",
    "GET /api/history/{stock_code}/range?start=20250801&end=20251108 - Get stock history by date range",
    "GET /api/history/gainers/{date}?limit=10 - Get top gainers from history",
    "GET /api/history/losers/{date}?limit=10 - Get top losers from history",
    "GET /api/history/dates/available?limit=7 - Get available trading dates",
    "GET /api/filter/stocks?days=7&min_change=0&max_change=100&max_mktcap=10000&limit=50 - Multi-day change filter",
    "GET /api/realtime/mktcap/{stock_code} - Real-time market cap",
    "GET /api/strategy/scan?volume_multiplier=2.0&min_change_increase=5.0 - Volume surge strategy scan",
];

/// 인덱스 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// GET /api
pub async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Stock Data API Server".to_string(),
        version: state.version.clone(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}
