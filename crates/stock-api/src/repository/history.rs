//! 종목별 일봉 이력 저장소 (`stock_history`).

use sqlx::SqlitePool;

use stock_core::HistoryBar;

use super::decode_rows;

const HISTORY_COLUMNS: &str = r#"
    CAST(id AS INTEGER) AS id,
    stock_code,
    stock_name,
    exchange,
    trade_date,
    CAST(open AS REAL) AS open,
    CAST(high AS REAL) AS high,
    CAST(low AS REAL) AS low,
    CAST(close AS REAL) AS close,
    CAST(volume AS INTEGER) AS volume,
    CAST(amount AS REAL) AS amount,
    import_time
"#;

/// 일봉 이력 저장소.
pub struct HistoryRepository;

impl HistoryRepository {
    /// 최신순 이력 한 페이지.
    pub async fn get_history(
        pool: &SqlitePool,
        stock_code: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryBar>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {} FROM stock_history
            WHERE stock_code = ?
            ORDER BY trade_date DESC
            LIMIT ? OFFSET ?
            "#,
            HISTORY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(stock_code)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(decode_rows(rows, "history_page"))
    }

    pub async fn count_history(pool: &SqlitePool, stock_code: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_history WHERE stock_code = ?")
            .bind(stock_code)
            .fetch_one(pool)
            .await
    }

    /// `start..=end` 구간 이력 (오래된 순).
    pub async fn get_history_range(
        pool: &SqlitePool,
        stock_code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<HistoryBar>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {} FROM stock_history
            WHERE stock_code = ? AND trade_date >= ? AND trade_date <= ?
            ORDER BY trade_date ASC
            "#,
            HISTORY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(stock_code)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?;

        Ok(decode_rows(rows, "history_range"))
    }

    /// 이력 테이블에 있는 최근 거래일 (최신순).
    pub async fn distinct_recent_dates(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT trade_date FROM stock_history ORDER BY trade_date DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// `date`보다 앞선 가장 최근 거래일.
    pub async fn latest_date_before(
        pool: &SqlitePool,
        date: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT DISTINCT trade_date FROM stock_history
            WHERE trade_date < ?
            ORDER BY trade_date DESC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    /// 특정 거래일의 종가.
    pub async fn close_on(
        pool: &SqlitePool,
        stock_code: &str,
        trade_date: &str,
    ) -> Result<Option<f64>, sqlx::Error> {
        let close: Option<Option<f64>> = sqlx::query_scalar(
            "SELECT CAST(close AS REAL) FROM stock_history WHERE stock_code = ? AND trade_date = ?",
        )
        .bind(stock_code)
        .bind(trade_date)
        .fetch_optional(pool)
        .await?;

        Ok(close.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::testing::seed_market_data;

    async fn pool() -> SqlitePool {
        let pool = memory_pool().unwrap();
        seed_market_data(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let pool = pool().await;
        let bars = HistoryRepository::get_history(&pool, "300750", 60, 0)
            .await
            .unwrap();

        let dates: Vec<&str> = bars.iter().map(|b| b.trade_date.as_str()).collect();
        assert_eq!(dates, vec!["20250106", "20250103", "20250102"]);
        assert_eq!(bars[0].close, 110.0);
        assert_eq!(bars[0].volume, 3000);
        assert_eq!(bars[0].exchange, "SZ");

        let page = HistoryRepository::get_history(&pool, "300750", 1, 1)
            .await
            .unwrap();
        assert_eq!(page[0].trade_date, "20250103");
    }

    #[tokio::test]
    async fn test_undecodable_rows_are_undercounted() {
        let pool = pool().await;
        let bars = HistoryRepository::get_history(&pool, "000002", 60, 0)
            .await
            .unwrap();
        assert!(bars.is_empty());
        assert_eq!(
            HistoryRepository::count_history(&pool, "000002").await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_range_is_closed_interval_ascending() {
        let pool = pool().await;
        let bars = HistoryRepository::get_history_range(&pool, "600000", "20250103", "20250106")
            .await
            .unwrap();

        let dates: Vec<&str> = bars.iter().map(|b| b.trade_date.as_str()).collect();
        assert_eq!(dates, vec!["20250103", "20250106"]);

        let empty = HistoryRepository::get_history_range(&pool, "600000", "20250107", "20250110")
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_recent_dates() {
        let pool = pool().await;
        let dates = HistoryRepository::distinct_recent_dates(&pool, 2).await.unwrap();
        assert_eq!(dates, vec!["20250106", "20250103"]);
    }

    #[tokio::test]
    async fn test_latest_date_before() {
        let pool = pool().await;
        assert_eq!(
            HistoryRepository::latest_date_before(&pool, "20250103")
                .await
                .unwrap()
                .as_deref(),
            Some("20250102")
        );
        assert!(HistoryRepository::latest_date_before(&pool, "20250102")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_close_on() {
        let pool = pool().await;
        assert_eq!(
            HistoryRepository::close_on(&pool, "920003", "20250106").await.unwrap(),
            Some(19.0)
        );
        assert_eq!(
            HistoryRepository::close_on(&pool, "000002", "20250106").await.unwrap(),
            None
        );
        assert_eq!(
            HistoryRepository::close_on(&pool, "920003", "20250101").await.unwrap(),
            None
        );
    }
}
