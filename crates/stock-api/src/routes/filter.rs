//! 다일 등락률 필터 라우트.
//!
//! `GET /api/filter/stocks?days=7&min_change=0&max_change=100&max_mktcap=10000&limit=50`
//!
//! 최근 `days`개 거래일 동안 등락률이 범위 안에 든 날이 있는 종목을
//! 종목 코드 순으로 반환합니다. `max_mktcap`은 억 위안 단위입니다.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use stock_core::{FilterParams, FilteredStock};

use super::non_negative;
use crate::error::{db_error, ApiQuery, ApiResult};
use crate::repository::MultiDayFilterRepository;
use crate::state::AppState;

/// 필터 쿼리.
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default)]
    pub min_change: f64,
    #[serde(default = "default_max_change")]
    pub max_change: f64,
    #[serde(default = "default_max_mktcap")]
    pub max_mktcap: f64,
    #[serde(default = "default_filter_limit")]
    pub limit: i64,
}

fn default_days() -> i64 {
    7
}

fn default_max_change() -> f64 {
    100.0
}

fn default_max_mktcap() -> f64 {
    10_000.0
}

fn default_filter_limit() -> i64 {
    50
}

impl From<FilterQuery> for FilterParams {
    fn from(query: FilterQuery) -> Self {
        Self {
            days: non_negative(query.days),
            min_change: query.min_change,
            max_change: query.max_change,
            max_mktcap: query.max_mktcap,
            limit: non_negative(query.limit) as usize,
        }
    }
}

/// 필터 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterResponse {
    pub days: i64,
    pub min_change: f64,
    pub max_change: f64,
    pub count: usize,
    pub filtered_stocks: Vec<FilteredStock>,
}

/// GET /api/filter/stocks
pub async fn filter_stocks(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<FilterQuery>,
) -> ApiResult<Json<FilterResponse>> {
    let params = FilterParams::from(query);
    info!(
        days = params.days,
        min_change = params.min_change,
        max_change = params.max_change,
        max_mktcap = params.max_mktcap,
        limit = params.limit,
        "Multi-day filter requested"
    );

    let stocks = MultiDayFilterRepository::run(&state.db_pool, &params)
        .await
        .map_err(|e| db_error("multi_day_filter", e))?;

    Ok(Json(FilterResponse {
        days: params.days,
        min_change: params.min_change,
        max_change: params.max_change,
        count: stocks.len(),
        filtered_stocks: stocks,
    }))
}

/// 필터 라우터 생성.
pub fn filter_router() -> Router<Arc<AppState>> {
    Router::new().route("/stocks", get(filter_stocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{get_json, seeded_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_filter_defaults() {
        let (status, body) = get_json(seeded_app().await, "/api/filter/stocks").await;
        assert_eq!(status, StatusCode::OK);

        let response: FilterResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.days, 7);
        assert_eq!(response.min_change, 0.0);
        assert_eq!(response.max_change, 100.0);
        assert_eq!(response.count, 3);

        let codes: Vec<&str> = response
            .filtered_stocks
            .iter()
            .map(|s| s.stock_code.as_str())
            .collect();
        assert_eq!(codes, vec!["300750", "600000", "920003"]);
    }

    #[tokio::test]
    async fn test_filter_window_and_range() {
        // 최근 1거래일, 5% 이상 → 600000(10%), 300750(8.91%)
        let (_, body) = get_json(
            seeded_app().await,
            "/api/filter/stocks?days=1&min_change=5&max_mktcap=0",
        )
        .await;
        let response: FilterResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.days, 1);
        let codes: Vec<&str> = response
            .filtered_stocks
            .iter()
            .map(|s| s.stock_code.as_str())
            .collect();
        assert_eq!(codes, vec!["300750", "600000"]);
        assert!(response.filtered_stocks.iter().all(|s| s.days_count == 1));

        let spdb = &response.filtered_stocks[1];
        assert_eq!(spdb.latest_price, 11.0);
        assert_eq!(spdb.mktcap, 3_000_000.0);
    }

    #[tokio::test]
    async fn test_filter_rejects_non_numeric() {
        let (status, body) = get_json(seeded_app().await, "/api/filter/stocks?days=week").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");
    }
}
