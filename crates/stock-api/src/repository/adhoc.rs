//! 임의 SELECT 쿼리 실행.
//!
//! 결과 컬럼을 미리 알 수 없으므로 값의 실제 저장 타입을 보고 JSON으로 변환합니다.
//! 풀은 읽기 전용으로 열려 있어 SELECT 외 구문은 데이터베이스에서 거부됩니다.

use futures::TryStreamExt;
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, SqlitePool, TypeInfo, ValueRef};
use tracing::{debug, warn};

/// JSON 객체 하나로 변환된 결과 행.
pub type JsonRow = Map<String, Value>;

/// 임의 쿼리 저장소.
pub struct AdhocQueryRepository;

impl AdhocQueryRepository {
    /// 쿼리를 실행하고 최대 `limit`개 행을 반환합니다.
    ///
    /// 행은 스트림으로 읽으며 `limit`에 도달하면 나머지는 읽지 않습니다.
    pub async fn run(
        pool: &SqlitePool,
        sql: &str,
        limit: usize,
    ) -> Result<Vec<JsonRow>, sqlx::Error> {
        let mut results = Vec::new();
        if limit == 0 {
            return Ok(results);
        }

        let mut rows = sqlx::query(sql).persistent(false).fetch(pool);
        while let Some(row) = rows.try_next().await? {
            match row_to_json(&row) {
                Ok(object) => results.push(object),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable row");
                    continue;
                }
            }
            if results.len() >= limit {
                break;
            }
        }

        debug!(count = results.len(), limit, "Ad-hoc query finished");
        Ok(results)
    }
}

fn row_to_json(row: &SqliteRow) -> Result<JsonRow, sqlx::Error> {
    let mut object = Map::with_capacity(row.columns().len());
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(column.name().to_string(), column_value(row, index)?);
    }
    Ok(object)
}

fn column_value(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" => Value::from(row.try_get::<f64, _>(index)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::testing::seed_market_data;
    use serde_json::json;

    async fn pool() -> SqlitePool {
        let pool = memory_pool().unwrap();
        seed_market_data(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_values_follow_storage_type() {
        let pool = pool().await;
        let rows = AdhocQueryRepository::run(
            &pool,
            "SELECT 1 AS n, 2.5 AS r, 'abc' AS s, NULL AS z, x'6869' AS b",
            100,
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        let row = Value::Object(rows[0].clone());
        assert_eq!(
            row,
            json!({"n": 1, "r": 2.5, "s": "abc", "z": null, "b": "hi"})
        );
    }

    #[tokio::test]
    async fn test_limit_stops_reading() {
        let pool = pool().await;
        let rows = AdhocQueryRepository::run(
            &pool,
            "SELECT stock_code FROM stock_history ORDER BY id",
            2,
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["stock_code"], json!("300750"));

        let none = AdhocQueryRepository::run(&pool, "SELECT 1", 0).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_null_area_is_null() {
        let pool = pool().await;
        let rows = AdhocQueryRepository::run(
            &pool,
            "SELECT symbol, area FROM stock_list WHERE symbol = '688001'",
            10,
        )
        .await
        .unwrap();
        assert_eq!(rows[0]["area"], Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_sql_is_error() {
        let pool = pool().await;
        let err = AdhocQueryRepository::run(&pool, "SELECT * FROM no_such_table", 10)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no_such_table"));
    }
}
