//! 카탈로그와 시장 통계 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /api/tables` - 테이블 목록
//! - `GET /api/stats` - 종목 수, 상승/하락 종목 수, 테이블 수

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use stock_core::{MarketStats, TableInfo, TradeDate, SNAPSHOT_TABLE_PREFIX};

use crate::error::{db_error, ApiQuery, ApiResult};
use crate::repository::{CatalogRepository, SnapshotRepository};
use crate::state::AppState;

/// 테이블 목록 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct TablesResponse {
    pub count: usize,
    pub tables: Vec<TableInfo>,
}

/// 통계 쿼리.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// 스냅샷 날짜 (YYYYMMDD). 없으면 최신 스냅샷
    #[serde(default)]
    pub date: Option<String>,
}

/// GET /api/tables
pub async fn list_tables(State(state): State<Arc<AppState>>) -> ApiResult<Json<TablesResponse>> {
    let tables = CatalogRepository::list_tables(&state.db_pool)
        .await
        .map_err(|e| db_error("list_tables", e))?;

    Ok(Json(TablesResponse {
        count: tables.len(),
        tables,
    }))
}

/// GET /api/stats
///
/// 개별 집계가 실패하면 해당 값은 0으로 응답합니다.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<StatsQuery>,
) -> Json<MarketStats> {
    let pool = &state.db_pool;
    let date = query.date.unwrap_or_default();

    let total_stocks = SnapshotRepository::count_instruments(pool)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to count instruments");
            0
        });
    let tables = CatalogRepository::count_tables(pool).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to count tables");
        0
    });

    let table = resolve_stats_table(&state, &date).await;
    debug!(date = %date, table = ?table, "Stats snapshot table");

    let (gainers, losers) = match &table {
        Some(table) => SnapshotRepository::count_by_change_sign(pool, table)
            .await
            .unwrap_or_else(|e| {
                warn!(table = %table, error = %e, "Failed to count gainers/losers");
                (0, 0)
            }),
        None => (0, 0),
    };

    Json(MarketStats {
        total_stocks,
        gainers,
        losers,
        tables,
        date,
    })
}

/// 지정된 날짜의 테이블, 또는 최신 스냅샷 테이블.
async fn resolve_stats_table(state: &AppState, date: &str) -> Option<String> {
    let pool = &state.db_pool;

    if date.is_empty() {
        return CatalogRepository::find_latest_table(pool, SNAPSHOT_TABLE_PREFIX)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to find latest snapshot table");
                None
            });
    }

    let table = TradeDate::parse(date).ok()?.snapshot_table();
    match CatalogRepository::table_exists(pool, &table).await {
        Ok(true) => Some(table),
        Ok(false) => None,
        Err(e) => {
            warn!(table = %table, error = %e, "Failed to check snapshot table");
            None
        }
    }
}

/// 카탈로그 라우터 생성.
pub fn catalog_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tables", get(list_tables))
        .route("/stats", get(get_stats))
}
