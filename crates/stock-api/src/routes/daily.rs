//! 일별 스냅샷 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/daily/{date}` - 스냅샷 한 페이지
//! - `GET /api/daily/{date}/top` - 등락률 상위
//! - `GET /api/daily/{date}/bottom` - 등락률 하위
//!
//! 날짜 형식이 잘못되었거나 해당 날짜의 테이블이 없으면 404입니다.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stock_core::{DailySnapshot, MoverDirection, TradeDate};

use super::{non_negative, MoversResponse};
use crate::error::{db_error, not_found, ApiError, ApiQuery, ApiResult};
use crate::repository::SnapshotRepository;
use crate::state::AppState;

/// 스냅샷 페이지 쿼리.
#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    #[serde(default = "default_daily_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// 등락 순위 쿼리.
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_daily_limit")]
    pub limit: i64,
}

fn default_daily_limit() -> i64 {
    10
}

/// 스냅샷 페이지 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct DailyResponse {
    pub date: String,
    pub count: usize,
    pub data: Vec<DailySnapshot>,
}

fn no_data(date: &str) -> ApiError {
    not_found(format!("No data for date: {}", date))
}

/// GET /api/daily/{date}
pub async fn get_daily(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    ApiQuery(query): ApiQuery<DailyQuery>,
) -> ApiResult<Json<DailyResponse>> {
    let trade_date = TradeDate::parse(&date).map_err(|_| no_data(&date))?;

    let data = SnapshotRepository::get_snapshot_page(
        &state.db_pool,
        &trade_date,
        non_negative(query.limit),
        non_negative(query.offset),
    )
    .await
    .map_err(|e| db_error("snapshot_page", e))?
    .ok_or_else(|| no_data(&date))?;

    Ok(Json(DailyResponse {
        date,
        count: data.len(),
        data,
    }))
}

async fn daily_movers(
    state: &AppState,
    date: String,
    limit: i64,
    direction: MoverDirection,
) -> ApiResult<Json<MoversResponse<DailySnapshot>>> {
    let trade_date = TradeDate::parse(&date).map_err(|_| no_data(&date))?;

    let movers = SnapshotRepository::get_top_by_change(
        &state.db_pool,
        &trade_date,
        non_negative(limit),
        direction,
    )
    .await
    .map_err(|e| db_error("snapshot_top_by_change", e))?
    .ok_or_else(|| no_data(&date))?;

    Ok(Json(MoversResponse {
        date,
        direction,
        movers,
    }))
}

/// GET /api/daily/{date}/top
pub async fn get_top_gainers(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    ApiQuery(query): ApiQuery<TopQuery>,
) -> ApiResult<Json<MoversResponse<DailySnapshot>>> {
    daily_movers(&state, date, query.limit, MoverDirection::Gainers).await
}

/// GET /api/daily/{date}/bottom
pub async fn get_top_losers(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    ApiQuery(query): ApiQuery<TopQuery>,
) -> ApiResult<Json<MoversResponse<DailySnapshot>>> {
    daily_movers(&state, date, query.limit, MoverDirection::Losers).await
}

/// 일별 스냅샷 라우터 생성.
pub fn daily_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{date}", get(get_daily))
        .route("/{date}/top", get(get_top_gainers))
        .route("/{date}/bottom", get(get_top_losers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, seeded_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_daily_page() {
        let (status, body) = get_json(seeded_app().await, "/api/daily/20250106?limit=2").await;
        assert_eq!(status, StatusCode::OK);

        let response: DailyResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.date, "20250106");
        assert_eq!(response.count, 2);
        assert_eq!(response.data[0].symbol, "sh600000");
        assert_eq!(response.data[0].code, 600000);
        assert_eq!(response.data[0].mktcap, 3_000_000.0);
    }

    #[tokio::test]
    async fn test_daily_missing_table_is_404() {
        let (status, body) = get_json(seeded_app().await, "/api/daily/20240101").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No data for date: 20240101");

        let (status, body) = get_json(seeded_app().await, "/api/daily/backup").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No data for date: backup");
    }

    #[tokio::test]
    async fn test_top_and_bottom() {
        let app = seeded_app().await;

        let (status, body) = get_json(app.clone(), "/api/daily/20250106/top?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["top_gainers"][0]["symbol"], "sh600000");
        assert_eq!(body["top_gainers"][1]["symbol"], "sz300750");

        let (_, body) = get_json(app.clone(), "/api/daily/20250106/bottom?limit=1").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["top_losers"][0]["changepercent"], -2.0);

        let (status, _) = get_json(app, "/api/daily/20240101/top").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
