//! 종목 목록과 일별 스냅샷 저장소.

use sqlx::SqlitePool;
use tracing::debug;

use stock_core::{
    DailySnapshot, Instrument, InstrumentWithQuote, MoverDirection, SnapshotMetrics, TradeDate,
};

use super::{decode_optional, decode_rows, quote_ident, CatalogRepository};

const INSTRUMENT_COLUMNS: &str = "ts_code, symbol, name, area, industry, list_date, pinyin";

const SNAPSHOT_COLUMNS: &str = r#"
    symbol,
    CAST(code AS INTEGER) AS code,
    name,
    CAST(trade AS REAL) AS trade,
    CAST(pricechange AS REAL) AS pricechange,
    CAST(changepercent AS REAL) AS changepercent,
    CAST(buy AS REAL) AS buy,
    CAST(sell AS REAL) AS sell,
    CAST(settlement AS REAL) AS settlement,
    CAST(open AS REAL) AS open,
    CAST(high AS REAL) AS high,
    CAST(low AS REAL) AS low,
    CAST(volume AS INTEGER) AS volume,
    CAST(amount AS INTEGER) AS amount,
    ticktime,
    CAST(per AS REAL) AS per,
    CAST(pb AS REAL) AS pb,
    CAST(mktcap AS REAL) AS mktcap,
    CAST(nmc AS REAL) AS nmc,
    CAST(turnoverratio AS REAL) AS turnoverratio,
    dump_time
"#;

/// 종목/스냅샷 저장소.
pub struct SnapshotRepository;

impl SnapshotRepository {
    pub async fn count_instruments(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_list")
            .fetch_one(pool)
            .await
    }

    /// 종목 목록에 최신 스냅샷 필드를 붙여 조회합니다.
    ///
    /// 스냅샷 행은 접두사를 뗀 종목 코드로 묶어 컬럼별 최댓값을 사용합니다.
    /// 재수집으로 생긴 중복 행을 합치기 위한 것으로, 결과가 서로 다른 행의
    /// 값으로 조합될 수 있습니다.
    pub async fn list_instruments(
        pool: &SqlitePool,
        snapshot_table: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InstrumentWithQuote>, sqlx::Error> {
        let sql = match snapshot_table {
            Some(table) => format!(
                r#"
                SELECT
                    sl.ts_code, sl.symbol, sl.name, sl.pinyin,
                    CAST(d.trade AS REAL) AS trade,
                    CAST(d.changepercent AS REAL) AS changepercent,
                    CAST(d.mktcap AS REAL) AS mktcap,
                    CAST(d.turnoverratio AS REAL) AS turnoverratio
                FROM stock_list sl
                LEFT JOIN (
                    SELECT
                        REPLACE(REPLACE(REPLACE(symbol, 'sh', ''), 'sz', ''), 'bj', '') AS clean_symbol,
                        MAX(trade) AS trade,
                        MAX(changepercent) AS changepercent,
                        MAX(mktcap) AS mktcap,
                        MAX(turnoverratio) AS turnoverratio
                    FROM {}
                    GROUP BY clean_symbol
                ) d ON sl.symbol = d.clean_symbol
                LIMIT ? OFFSET ?
                "#,
                quote_ident(table)
            ),
            None => r#"
                SELECT
                    ts_code, symbol, name, pinyin,
                    NULL AS trade, NULL AS changepercent, NULL AS mktcap, NULL AS turnoverratio
                FROM stock_list
                LIMIT ? OFFSET ?
                "#
            .to_string(),
        };

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(decode_rows(rows, "list_instruments"))
    }

    /// 종목 코드로 조회. 디코딩 실패는 에러로 반환합니다.
    pub async fn get_instrument(
        pool: &SqlitePool,
        symbol: &str,
    ) -> Result<Option<Instrument>, sqlx::Error> {
        let sql = format!("SELECT {} FROM stock_list WHERE symbol = ?", INSTRUMENT_COLUMNS);
        sqlx::query_as::<_, Instrument>(&sql)
            .bind(symbol)
            .fetch_optional(pool)
            .await
    }

    /// 이름, 코드, 병음 중 하나에 검색어가 포함된 종목.
    ///
    /// 대소문자를 구분하며 `%`, `_`도 문자 그대로 비교합니다.
    pub async fn search(
        pool: &SqlitePool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<Instrument>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {} FROM stock_list
            WHERE instr(name, ?) > 0 OR instr(symbol, ?) > 0 OR instr(pinyin, ?) > 0
            LIMIT ?
            "#,
            INSTRUMENT_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(term)
            .bind(term)
            .bind(term)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(decode_rows(rows, "search_instruments"))
    }

    /// 해당 날짜의 스냅샷 한 페이지. 테이블이 없으면 `None`.
    pub async fn get_snapshot_page(
        pool: &SqlitePool,
        date: &TradeDate,
        limit: i64,
        offset: i64,
    ) -> Result<Option<Vec<DailySnapshot>>, sqlx::Error> {
        let table = date.snapshot_table();
        if !CatalogRepository::table_exists(pool, &table).await? {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM {} LIMIT ? OFFSET ?",
            SNAPSHOT_COLUMNS,
            quote_ident(&table)
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(Some(decode_rows(rows, "snapshot_page")))
    }

    /// 등락률 순으로 정렬한 스냅샷. 테이블이 없으면 `None`.
    pub async fn get_top_by_change(
        pool: &SqlitePool,
        date: &TradeDate,
        limit: i64,
        direction: MoverDirection,
    ) -> Result<Option<Vec<DailySnapshot>>, sqlx::Error> {
        let table = date.snapshot_table();
        if !CatalogRepository::table_exists(pool, &table).await? {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM {} ORDER BY changepercent {} LIMIT ?",
            SNAPSHOT_COLUMNS,
            quote_ident(&table),
            direction.sort_order()
        );
        let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;

        Ok(Some(decode_rows(rows, "snapshot_top_by_change")))
    }

    /// 상승/하락 종목 수 (행 기준).
    pub async fn count_by_change_sign(
        pool: &SqlitePool,
        table: &str,
    ) -> Result<(i64, i64), sqlx::Error> {
        let sql = format!(
            r#"
            SELECT
                COUNT(CASE WHEN changepercent > 0 THEN 1 END) AS gainers,
                COUNT(CASE WHEN changepercent < 0 THEN 1 END) AS losers
            FROM {}
            "#,
            quote_ident(table)
        );
        sqlx::query_as::<_, (i64, i64)>(&sql).fetch_one(pool).await
    }

    /// 접두사가 붙은 심볼로 회전율과 시가총액을 찾습니다.
    ///
    /// 행이 없거나 값이 비어 있으면 `None`.
    pub async fn find_metrics(
        pool: &SqlitePool,
        table: &str,
        symbol: &str,
    ) -> Result<Option<SnapshotMetrics>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT
                CAST(turnoverratio AS REAL) AS turnover_ratio,
                CAST(mktcap AS REAL) AS mktcap
            FROM {}
            WHERE symbol = ?
            LIMIT 1
            "#,
            quote_ident(table)
        );
        let row = sqlx::query(&sql).bind(symbol).fetch_optional(pool).await?;

        let metrics = decode_optional::<SnapshotMetrics>(row, "snapshot_metrics");
        debug!(table, symbol, found = metrics.is_some(), "Snapshot metrics lookup");
        Ok(metrics)
    }

    /// 접두사가 붙은 심볼의 시가총액 (만 위안).
    pub async fn find_mktcap(
        pool: &SqlitePool,
        table: &str,
        symbol: &str,
    ) -> Result<Option<f64>, sqlx::Error> {
        let sql = format!(
            "SELECT CAST(mktcap AS REAL) FROM {} WHERE symbol = ? LIMIT 1",
            quote_ident(table)
        );
        let mktcap: Option<Option<f64>> = sqlx::query_scalar(&sql)
            .bind(symbol)
            .fetch_optional(pool)
            .await?;

        Ok(mktcap.flatten())
    }
}
