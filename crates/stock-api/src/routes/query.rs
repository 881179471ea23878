//! 임의 SQL 조회 라우트.
//!
//! `GET /api/query?sql=SELECT...&limit=100`
//!
//! 앞뒤 공백을 제거한 뒤 `SELECT`로 시작하는 쿼리만 허용합니다 (대소문자 무시).
//! 운영자용 진단 엔드포인트이므로 데이터베이스 에러 메시지를 그대로 돌려줍니다.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{bad_request, forbidden, internal_error, ApiQuery, ApiResult};
use crate::repository::{adhoc::JsonRow, AdhocQueryRepository};
use crate::state::AppState;

/// 반환 행 수 상한.
pub const MAX_QUERY_ROWS: i64 = 1000;

/// 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub sql: String,
    #[serde(default = "default_query_limit")]
    pub limit: i64,
}

fn default_query_limit() -> i64 {
    100
}

/// 쿼리 결과 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<JsonRow>,
}

/// SELECT 문인지 확인합니다.
pub fn is_select(sql: &str) -> bool {
    sql.trim().to_uppercase().starts_with("SELECT")
}

/// GET /api/query
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<QueryParams>,
) -> ApiResult<Json<QueryResponse>> {
    if params.sql.is_empty() {
        return Err(bad_request("Query parameter 'sql' is required"));
    }
    if !is_select(&params.sql) {
        warn!(sql = %params.sql, "Rejected non-SELECT query");
        return Err(forbidden("Only SELECT queries are allowed"));
    }

    let limit = params.limit.clamp(0, MAX_QUERY_ROWS) as usize;
    info!(sql = %params.sql, limit, "Running ad-hoc query");

    let results = AdhocQueryRepository::run(&state.db_pool, &params.sql, limit)
        .await
        .map_err(|e| {
            warn!(error = %e, "Ad-hoc query failed");
            internal_error(e.to_string())
        })?;

    Ok(Json(QueryResponse {
        query: params.sql,
        count: results.len(),
        results,
    }))
}

/// 임의 쿼리 라우터 생성.
pub fn query_router() -> Router<Arc<AppState>> {
    Router::new().route("/query", get(run_query))
}
