//! 일봉 이력 기반 단일 거래일 등락 순위.
//!
//! 이력 테이블에는 등락률이 없으므로 직전 거래일 종가를 찾아 계산합니다.
//! 직전 거래일은 종목마다 `trade_date < D`인 행 중 가장 최근 날짜이며
//! (거래 정지 종목은 날짜가 다를 수 있음), 이전 행이 없으면 당일 시가를 사용합니다.
//! 기준 가격이 0 이하인 종목은 제외합니다.

use sqlx::SqlitePool;
use tracing::debug;

use stock_core::{HistoricalMover, MoverDirection};

use super::decode_rows;

/// 등락 순위 저장소.
pub struct MoversRepository;

impl MoversRepository {
    /// `date`의 등락률 순위.
    pub async fn top_movers(
        pool: &SqlitePool,
        date: &str,
        limit: i64,
        direction: MoverDirection,
    ) -> Result<Vec<HistoricalMover>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH current_day AS (
                SELECT
                    stock_code, stock_name, exchange, trade_date,
                    CAST(open AS REAL) AS open,
                    CAST(high AS REAL) AS high,
                    CAST(low AS REAL) AS low,
                    CAST(close AS REAL) AS close,
                    CAST(volume AS INTEGER) AS volume,
                    CAST(amount AS REAL) AS amount
                FROM stock_history
                WHERE trade_date = ?
            ),
            previous_day AS (
                SELECT h1.stock_code, CAST(h1.close AS REAL) AS prev_close
                FROM stock_history h1
                INNER JOIN (
                    SELECT stock_code, MAX(trade_date) AS prev_date
                    FROM stock_history
                    WHERE trade_date < ?
                    GROUP BY stock_code
                ) h2 ON h1.stock_code = h2.stock_code AND h1.trade_date = h2.prev_date
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
                COALESCE(p.prev_close, c.open) AS prev_close,
                c.close - COALESCE(p.prev_close, c.open) AS change,
                (c.close - COALESCE(p.prev_close, c.open)) / COALESCE(p.prev_close, c.open) * 100
                    AS change_percent
            FROM current_day c
            LEFT JOIN previous_day p ON c.stock_code = p.stock_code
            WHERE COALESCE(p.prev_close, c.open) > 0
            ORDER BY change_percent {}
            LIMIT ?
            "#,
            direction.sort_order()
        );

        let rows = sqlx::query(&sql)
            .bind(date)
            .bind(date)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        let movers: Vec<HistoricalMover> = decode_rows(rows, "historical_movers");
        debug!(date, ?direction, count = movers.len(), "Historical movers computed");
        Ok(movers)
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
    async fn test_gainers_use_per_stock_previous_close() {
        let pool = pool().await;
        let gainers = MoversRepository::top_movers(&pool, "20250106", 10, MoverDirection::Gainers)
            .await
            .unwrap();

        let codes: Vec<&str> = gainers.iter().map(|m| m.stock_code.as_str()).collect();
        assert_eq!(codes, vec!["600000", "300750", "000001", "920003"]);

        let catl = &gainers[1];
        assert_eq!(catl.prev_close, 101.0);
        assert!((catl.change - 9.0).abs() < 1e-9);
        assert!((catl.change_percent - 9.0 / 101.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_first_row_falls_back_to_open() {
        let pool = pool().await;
        let gainers = MoversRepository::top_movers(&pool, "20250106", 10, MoverDirection::Gainers)
            .await
            .unwrap();

        let pingan = gainers.iter().find(|m| m.stock_code == "000001").unwrap();
        assert_eq!(pingan.prev_close, 10.0);
        assert!((pingan.change_percent - 5.0).abs() < 1e-9);

        // 시가 0, 이전 행 없음
        assert!(gainers.iter().all(|m| m.stock_code != "688001"));
    }

    #[tokio::test]
    async fn test_losers_reverse_gainers() {
        let pool = pool().await;
        let gainers = MoversRepository::top_movers(&pool, "20250106", 10, MoverDirection::Gainers)
            .await
            .unwrap();
        let losers = MoversRepository::top_movers(&pool, "20250106", 10, MoverDirection::Losers)
            .await
            .unwrap();

        let mut reversed: Vec<String> = gainers.into_iter().map(|m| m.stock_code).collect();
        reversed.reverse();
        let losers: Vec<String> = losers.into_iter().map(|m| m.stock_code).collect();
        assert_eq!(reversed, losers);
    }

    #[tokio::test]
    async fn test_unknown_date_is_empty() {
        let pool = pool().await;
        let movers = MoversRepository::top_movers(&pool, "20250107", 10, MoverDirection::Gainers)
            .await
            .unwrap();
        assert!(movers.is_empty());
    }
}
