//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.
//!
//! 날짜가 붙은 테이블 이름은 바인딩할 수 없으므로 SQL에 직접 넣습니다.
//! 이 경우 카탈로그에서 존재를 확인했거나 8자리 날짜로 만든 이름만 사용하고
//! 항상 [`quote_ident`]로 감쌉니다.
//!
//! 행은 하나씩 디코딩하며, 디코딩에 실패한 행은 경고 로그를 남기고 건너뜁니다.
//! 숫자 컬럼은 저장 형태와 무관하게 디코딩되도록 SQL에서 `CAST`합니다.

pub mod adhoc;
pub mod catalog;
pub mod filter;
pub mod history;
pub mod movers;
pub mod snapshot;
pub mod strategy;

pub use adhoc::AdhocQueryRepository;
pub use catalog::CatalogRepository;
pub use filter::MultiDayFilterRepository;
pub use history::HistoryRepository;
pub use movers::MoversRepository;
pub use snapshot::SnapshotRepository;
pub use strategy::{ScanError, StrategyRepository, StrategyScan};

use sqlx::{sqlite::SqliteRow, FromRow};
use tracing::{debug, warn};

/// SQL 식별자를 큰따옴표로 감쌉니다.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 행을 하나씩 디코딩하고 실패한 행은 건너뜁니다.
pub(crate) fn decode_rows<T>(rows: Vec<SqliteRow>, context: &'static str) -> Vec<T>
where
    T: for<'r> FromRow<'r, SqliteRow>,
{
    let fetched = rows.len();
    let decoded: Vec<T> = rows
        .iter()
        .filter_map(|row| match T::from_row(row) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(context, error = %e, "Skipping row that failed to decode");
                None
            }
        })
        .collect();

    if decoded.len() < fetched {
        debug!(context, fetched, decoded = decoded.len(), "Rows skipped");
    }
    decoded
}

/// 단일 행 디코딩. 실패하면 경고 후 `None`.
pub(crate) fn decode_optional<T>(row: Option<SqliteRow>, context: &'static str) -> Option<T>
where
    T: for<'r> FromRow<'r, SqliteRow>,
{
    let row = row?;
    match T::from_row(&row) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(context, error = %e, "Skipping row that failed to decode");
            None
        }
    }
}
