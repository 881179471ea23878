//! 거래량 급증 + 등락 가속 전략 스캔 저장소.
//!
//! 기준일(D)과 직전 거래일(P)은 스냅샷 테이블 카탈로그에서,
//! 그 이전 거래일(PP)은 이력 테이블에서 구합니다.
//! 후보 조회 후 최신 스냅샷 테이블의 회전율/시가총액으로 한 번 더 거릅니다.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use stock_core::{
    snapshot_symbol, StrategyDates, StrategyHit, StrategyParams, TradeDate,
    SNAPSHOT_TABLE_PREFIX,
};

use super::{decode_rows, CatalogRepository, HistoryRepository, SnapshotRepository};

/// 전략 스캔 오류.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No trading data available")]
    NoTradingData,

    #[error("Cannot find previous trading date")]
    NoPreviousDate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// 스캔 결과와 사용한 거래일.
#[derive(Debug, Clone)]
pub struct StrategyScan {
    pub dates: StrategyDates,
    pub results: Vec<StrategyHit>,
}

/// 전략 스캔 저장소.
pub struct StrategyRepository;

impl StrategyRepository {
    /// 스캔에 사용할 세 거래일을 정합니다.
    ///
    /// `date`가 없으면 최신 스냅샷 테이블의 날짜를 사용합니다.
    /// 지정된 날짜는 검증하지 않고 테이블 이름 비교에만 사용합니다.
    pub async fn resolve_dates(
        pool: &SqlitePool,
        date: Option<&str>,
    ) -> Result<StrategyDates, ScanError> {
        let date = match date.filter(|d| !d.is_empty()) {
            Some(date) => date.to_string(),
            None => CatalogRepository::find_latest_table(pool, SNAPSHOT_TABLE_PREFIX)
                .await?
                .and_then(|table| TradeDate::from_table_name(SNAPSHOT_TABLE_PREFIX, &table))
                .map(String::from)
                .ok_or(ScanError::NoTradingData)?,
        };

        let current_table = format!("{}_{}", SNAPSHOT_TABLE_PREFIX, date);
        let prev_date = CatalogRepository::latest_table_before(
            pool,
            SNAPSHOT_TABLE_PREFIX,
            &current_table,
        )
        .await?
        .and_then(|table| TradeDate::from_table_name(SNAPSHOT_TABLE_PREFIX, &table))
        .map(String::from)
        .ok_or(ScanError::NoPreviousDate)?;

        let prev_prev_date = match HistoryRepository::latest_date_before(pool, &prev_date).await? {
            Some(found) => found,
            None => {
                warn!(
                    prev_date = %prev_date,
                    "No history before previous date, previous change will be 0"
                );
                prev_date.clone()
            }
        };

        Ok(StrategyDates {
            date,
            prev_date,
            prev_prev_date,
        })
    }

    /// 거래량 배수와 가속도 조건을 만족한 후보.
    ///
    /// 거래량 배수 내림차순, 당일 등락률 내림차순으로 정렬합니다.
    pub async fn candidates(
        pool: &SqlitePool,
        dates: &StrategyDates,
        params: &StrategyParams,
    ) -> Result<Vec<StrategyHit>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            WITH prev_prev_day AS (
                SELECT stock_code, CAST(close AS REAL) AS prev_prev_close
                FROM stock_history
                WHERE trade_date = ?
            ),
            previous_day AS (
                SELECT
                    h.stock_code,
                    CAST(h.close AS REAL) AS prev_close,
                    CAST(h.volume AS INTEGER) AS prev_volume,
                    CASE
                        WHEN COALESCE(pp.prev_prev_close, 0) > 0
                        THEN (CAST(h.close AS REAL) - pp.prev_prev_close) / pp.prev_prev_close * 100
                        ELSE 0.0
                    END AS prev_change_percent
                FROM stock_history h
                LEFT JOIN prev_prev_day pp ON h.stock_code = pp.stock_code
                WHERE h.trade_date = ?
            ),
            current_day AS (
                SELECT
                    h.stock_code,
                    h.stock_name,
                    h.exchange,
                    h.trade_date,
                    CAST(h.open AS REAL) AS open,
                    CAST(h.high AS REAL) AS high,
                    CAST(h.low AS REAL) AS low,
                    CAST(h.close AS REAL) AS close,
                    CAST(h.volume AS INTEGER) AS volume,
                    CAST(h.amount AS REAL) AS amount,
                    CASE
                        WHEN COALESCE(p.prev_close, 0) > 0
                        THEN (CAST(h.close AS REAL) - p.prev_close) / p.prev_close * 100
                        ELSE 0.0
                    END AS change_percent
                FROM stock_history h
                LEFT JOIN previous_day p ON h.stock_code = p.stock_code
                WHERE h.trade_date = ?
            )
            SELECT
                c.stock_code,
                c.stock_name,
                c.exchange,
                c.trade_date,
                c.open,
                c.close,
                c.high,
                c.low,
                c.volume,
                c.amount,
                c.change_percent,
                COALESCE(p.prev_volume, 0) AS prev_volume,
                COALESCE(p.prev_change_percent, 0.0) AS prev_change_percent,
                CASE
                    WHEN COALESCE(p.prev_volume, 0) > 0
                    THEN CAST(c.volume AS REAL) / CAST(p.prev_volume AS REAL)
                    ELSE 0.0
                END AS volume_ratio
            FROM current_day c
            LEFT JOIN previous_day p ON c.stock_code = p.stock_code
            WHERE c.volume > 0
              AND COALESCE(p.prev_volume, 0) > 0
              AND CAST(c.volume AS REAL) / CAST(p.prev_volume AS REAL) >= ?
              AND (c.change_percent - COALESCE(p.prev_change_percent, 0)) >= ?
            ORDER BY volume_ratio DESC, c.change_percent DESC
            LIMIT ?
            "#,
        )
        .bind(&dates.prev_prev_date)
        .bind(&dates.prev_date)
        .bind(&dates.date)
        .bind(params.volume_multiplier)
        .bind(params.min_change_increase)
        .bind(i64::try_from(params.candidate_limit()).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;

        Ok(decode_rows(rows, "strategy_candidates"))
    }

    /// 스캔 전체 실행.
    pub async fn scan(
        pool: &SqlitePool,
        params: &StrategyParams,
    ) -> Result<StrategyScan, ScanError> {
        info!(
            date = ?params.date,
            volume_multiplier = params.volume_multiplier,
            min_change_increase = params.min_change_increase,
            min_turnover = params.min_turnover,
            max_mktcap = params.max_mktcap,
            "Strategy scan started"
        );

        let dates = Self::resolve_dates(pool, params.date.as_deref()).await?;
        info!(
            date = %dates.date,
            prev_date = %dates.prev_date,
            prev_prev_date = %dates.prev_prev_date,
            "Strategy dates resolved"
        );

        let candidates = Self::candidates(pool, &dates, params).await?;

        let metrics_table = CatalogRepository::find_latest_table(pool, SNAPSHOT_TABLE_PREFIX).await?;
        debug!(table = ?metrics_table, candidates = candidates.len(), "Applying snapshot metrics");

        let mut results = Vec::new();
        for mut hit in candidates {
            if results.len() >= params.limit {
                break;
            }

            let metrics = match &metrics_table {
                Some(table) => {
                    let symbol = snapshot_symbol(&hit.exchange, &hit.stock_code);
                    SnapshotRepository::find_metrics(pool, table, &symbol).await?
                }
                None => None,
            };

            if params.admit(&mut hit, metrics) {
                results.push(hit);
            }
        }

        info!(count = results.len(), "Strategy scan finished");
        Ok(StrategyScan { dates, results })
    }
}
