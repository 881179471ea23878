//! SQLite 연결 풀.
//!
//! 서버는 데이터를 쓰지 않으므로 파일은 읽기 전용으로 엽니다.
//! `acquire_timeout`과 `busy_timeout`으로 모든 쿼리의 대기 시간에 상한을 둡니다.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::time::Duration;
use tracing::info;

use stock_core::DatabaseConfig;

/// 설정 파일의 경로로 읽기 전용 연결 풀을 생성합니다.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .read_only(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await?;

    info!(
        path = %config.path,
        max_connections = config.max_connections,
        "SQLite pool ready"
    );

    Ok(pool)
}

/// 테스트용 인메모리 풀.
///
/// 인메모리 DB는 연결마다 별개이므로 연결 하나를 계속 유지합니다.
pub fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_lazy("sqlite::memory:")
}
