//! 거래량 급증 + 등락 가속 전략 스캔 라우트.
//!
//! `GET /api/strategy/scan`
//!
//! | 파라미터 | 기본값 | 설명 |
//! |---|---|---|
//! | `date` | 최신 스냅샷 날짜 | 기준일 (YYYYMMDD) |
//! | `volume_multiplier` | 2.0 | 전일 대비 거래량 배수 하한 |
//! | `min_change_increase` | 5.0 | 등락률 가속도 하한 (%p) |
//! | `min_turnover` | 5.0 | 회전율 하한 (%) |
//! | `max_mktcap` | 0 | 시가총액 상한 (억 위안, 0은 무제한) |
//! | `limit` | 50 | 최대 결과 수 |

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stock_core::{StrategyHit, StrategyParams};

use super::non_negative;
use crate::error::{db_error, internal_error, ApiError, ApiQuery, ApiResult};
use crate::repository::{ScanError, StrategyRepository};
use crate::state::AppState;

/// 스캔 쿼리.
#[derive(Debug, Deserialize)]
pub struct StrategyQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default = "default_volume_multiplier")]
    pub volume_multiplier: f64,
    #[serde(default = "default_min_change_increase")]
    pub min_change_increase: f64,
    #[serde(default = "default_min_turnover")]
    pub min_turnover: f64,
    #[serde(default)]
    pub max_mktcap: f64,
    #[serde(default = "default_scan_limit")]
    pub limit: i64,
}

fn default_volume_multiplier() -> f64 {
    2.0
}

fn default_min_change_increase() -> f64 {
    5.0
}

fn default_min_turnover() -> f64 {
    5.0
}

fn default_scan_limit() -> i64 {
    50
}

impl From<StrategyQuery> for StrategyParams {
    fn from(query: StrategyQuery) -> Self {
        Self {
            date: query.date.filter(|d| !d.is_empty()),
            volume_multiplier: query.volume_multiplier,
            min_change_increase: query.min_change_increase,
            min_turnover: query.min_turnover,
            max_mktcap: query.max_mktcap,
            limit: non_negative(query.limit) as usize,
        }
    }
}

/// 스캔 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct StrategyResponse {
    pub date: String,
    pub prev_date: String,
    pub volume_multiplier: f64,
    pub min_change_increase: f64,
    pub min_turnover: f64,
    pub max_mktcap: f64,
    pub count: usize,
    pub results: Vec<StrategyHit>,
}

fn scan_error(err: ScanError) -> ApiError {
    match err {
        ScanError::Database(e) => db_error("strategy_scan", e),
        other => internal_error(other.to_string()),
    }
}

/// GET /api/strategy/scan
pub async fn scan_strategy(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<StrategyQuery>,
) -> ApiResult<Json<StrategyResponse>> {
    let params = StrategyParams::from(query);

    let scan = StrategyRepository::scan(&state.db_pool, &params)
        .await
        .map_err(scan_error)?;

    Ok(Json(StrategyResponse {
        date: scan.dates.date,
        prev_date: scan.dates.prev_date,
        volume_multiplier: params.volume_multiplier,
        min_change_increase: params.min_change_increase,
        min_turnover: params.min_turnover,
        max_mktcap: params.max_mktcap,
        count: scan.results.len(),
        results: scan.results,
    }))
}

/// 전략 라우터 생성.
pub fn strategy_router() -> Router<Arc<AppState>> {
    Router::new().route("/scan", get(scan_strategy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_app;
    use crate::routes::test_support::{get_json, seeded_app};
    use crate::state::create_test_state;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scan_defaults() {
        let (status, body) = get_json(seeded_app().await, "/api/strategy/scan").await;
        assert_eq!(status, StatusCode::OK);

        let response: StrategyResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.date, "20250106");
        assert_eq!(response.prev_date, "20250103");
        assert_eq!(response.volume_multiplier, 2.0);
        assert_eq!(response.min_turnover, 5.0);
        assert_eq!(response.max_mktcap, 0.0);
        assert_eq!(response.count, 1);

        let hit = &response.results[0];
        assert_eq!(hit.stock_code, "300750");
        assert_eq!(hit.prev_volume, 1000);
        assert_eq!(hit.turnover_ratio, 8.5);
    }

    #[tokio::test]
    async fn test_scan_with_params() {
        let (_, body) = get_json(
            seeded_app().await,
            "/api/strategy/scan?min_turnover=0&volume_multiplier=1.2&min_change_increase=-10",
        )
        .await;
        let response: StrategyResponse = serde_json::from_value(body).unwrap();

        // 920003: 거래량 1.5배, 가속도 -5%p
        let codes: Vec<&str> = response.results.iter().map(|h| h.stock_code.as_str()).collect();
        assert_eq!(codes, vec!["600000", "300750", "920003"]);
        assert_eq!(response.volume_multiplier, 1.2);
    }

    #[tokio::test]
    async fn test_scan_without_previous_table_is_500() {
        let (status, body) =
            get_json(seeded_app().await, "/api/strategy/scan?date=20250103").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Cannot find previous trading date");
    }

    #[tokio::test]
    async fn test_scan_without_snapshots_is_500() {
        let app = create_app(Arc::new(create_test_state()), Duration::from_secs(10));
        let (status, body) = get_json(app, "/api/strategy/scan").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No trading data available");
    }
}
