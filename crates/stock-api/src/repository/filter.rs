//! 다일 등락률 필터.
//!
//! 1. 이력 테이블에서 최근 N개 거래일을 구합니다.
//! 2. 각 (종목, 거래일)의 등락률을 종목별 직전 거래일 종가로 계산하고
//!    직전 종가가 있고 범위 안에 드는 행만 남깁니다.
//! 3. 종목별로 집계한 뒤 최신 스냅샷 테이블의 시가총액으로 한 번 더 거릅니다.

use sqlx::SqlitePool;
use tracing::{debug, info};

use stock_core::{
    snapshot_symbol, DailyChange, FilterParams, FilteredStock, MultiDayAggregator, TradeDate,
};

use super::{decode_rows, CatalogRepository, HistoryRepository, SnapshotRepository};

/// 다일 필터 저장소.
pub struct MultiDayFilterRepository;

impl MultiDayFilterRepository {
    /// 주어진 거래일들에서 등락률 범위를 만족한 행.
    ///
    /// 종목 코드 오름차순, 거래일 내림차순으로 반환합니다.
    /// 이전 행이 없는 첫 거래일은 제외됩니다.
    pub async fn daily_changes(
        pool: &SqlitePool,
        dates: &[String],
        min_change: f64,
        max_change: f64,
    ) -> Result<Vec<DailyChange>, sqlx::Error> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; dates.len()].join(", ");
        let sql = format!(
            r#"
            WITH daily_changes AS (
                SELECT
                    h1.stock_code,
                    h1.stock_name,
                    h1.exchange,
                    h1.trade_date,
                    CAST(h2.close AS REAL) AS prev_close,
                    CASE
                        WHEN h2.close > 0
                        THEN (CAST(h1.close AS REAL) - h2.close) / h2.close * 100
                        ELSE 0.0
                    END AS change_percent
                FROM stock_history h1
                LEFT JOIN stock_history h2 ON h1.stock_code = h2.stock_code
                    AND h2.trade_date = (
                        SELECT MAX(trade_date)
                        FROM stock_history
                        WHERE stock_code = h1.stock_code AND trade_date < h1.trade_date
                    )
                WHERE h1.trade_date IN ({})
            )
            SELECT stock_code, stock_name, exchange, trade_date, change_percent
            FROM daily_changes
            WHERE prev_close > 0
              AND change_percent >= ?
              AND change_percent <= ?
            ORDER BY stock_code, trade_date DESC
            "#,
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for date in dates {
            query = query.bind(date);
        }
        let rows = query
            .bind(min_change)
            .bind(max_change)
            .fetch_all(pool)
            .await?;

        Ok(decode_rows(rows, "daily_changes"))
    }

    /// 필터 전체 실행.
    ///
    /// 결과는 종목 코드 순(집계 순서)이며 집계값으로 다시 정렬하지 않습니다.
    pub async fn run(
        pool: &SqlitePool,
        params: &FilterParams,
    ) -> Result<Vec<FilteredStock>, sqlx::Error> {
        let dates = HistoryRepository::distinct_recent_dates(pool, params.days.max(0)).await?;
        if dates.is_empty() {
            debug!("No history dates available");
            return Ok(Vec::new());
        }

        let changes =
            Self::daily_changes(pool, &dates, params.min_change, params.max_change).await?;
        let aggregator: MultiDayAggregator = changes.into_iter().collect();
        info!(
            dates = dates.len(),
            stocks = aggregator.len(),
            "Multi-day changes aggregated"
        );

        let mktcap_table = Self::first_snapshot_table(pool, &dates).await?;
        debug!(table = ?mktcap_table, "Market cap source table");

        let mut stocks = Vec::new();
        for mut stock in aggregator.into_stocks() {
            if stocks.len() >= params.limit {
                break;
            }

            stock.latest_price =
                HistoryRepository::close_on(pool, &stock.stock_code, &stock.latest_date)
                    .await?
                    .unwrap_or_default();

            let mktcap = match &mktcap_table {
                Some(table) => {
                    let symbol = snapshot_symbol(&stock.exchange, &stock.stock_code);
                    SnapshotRepository::find_mktcap(pool, table, &symbol).await?
                }
                None => None,
            };

            if params.admit(&mut stock, mktcap) {
                stocks.push(stock);
            }
        }

        info!(count = stocks.len(), "Multi-day filter finished");
        Ok(stocks)
    }

    /// 윈도 안에서 스냅샷 테이블이 있는 가장 최근 날짜의 테이블.
    async fn first_snapshot_table(
        pool: &SqlitePool,
        dates: &[String],
    ) -> Result<Option<String>, sqlx::Error> {
        for date in dates {
            let Ok(date) = TradeDate::parse(date) else {
                continue;
            };
            let table = date.snapshot_table();
            if CatalogRepository::table_exists(pool, &table).await? {
                return Ok(Some(table));
            }
        }
        Ok(None)
    }
}
