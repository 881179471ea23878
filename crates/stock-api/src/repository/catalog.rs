//! 스키마 카탈로그 조회.
//!
//! 날짜별 테이블은 `<prefix>_YYYYMMDD` 이름을 갖습니다.
//! 날짜가 고정 폭 문자열이므로 이름의 사전순이 곧 날짜순입니다.

use sqlx::SqlitePool;

use stock_core::{dated_table_glob, TableInfo, TradeDate};

use super::decode_rows;

/// 카탈로그 저장소.
pub struct CatalogRepository;

impl CatalogRepository {
    /// 모든 테이블 (이름순).
    pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<TableInfo>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT name, type FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(decode_rows(rows, "list_tables"))
    }

    pub async fn count_tables(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
            .fetch_one(pool)
            .await
    }

    pub async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }

    /// 가장 최근 날짜의 테이블 이름. 없으면 `None`.
    pub async fn find_latest_table(
        pool: &SqlitePool,
        prefix: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name GLOB ?
            ORDER BY name DESC
            LIMIT 1
            "#,
        )
        .bind(dated_table_glob(prefix))
        .fetch_optional(pool)
        .await
    }

    /// `table`보다 이름이 앞서는 날짜 테이블 중 가장 최근 것.
    pub async fn latest_table_before(
        pool: &SqlitePool,
        prefix: &str,
        table: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name GLOB ? AND name < ?
            ORDER BY name DESC
            LIMIT 1
            "#,
        )
        .bind(dated_table_glob(prefix))
        .bind(table)
        .fetch_optional(pool)
        .await
    }

    /// 날짜 테이블의 날짜 목록 (최신순).
    pub async fn list_trailing_dates(
        pool: &SqlitePool,
        prefix: &str,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name GLOB ?
            ORDER BY name DESC
            LIMIT ?
            "#,
        )
        .bind(dated_table_glob(prefix))
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(names
            .iter()
            .filter_map(|name| TradeDate::from_table_name(prefix, name))
            .map(String::from)
            .collect())
    }
}
