//! 주식 시세 조회 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 읽기 전용 REST API
//! - SQLite 스냅샷/이력 테이블 조회 저장소
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`repository`]: SQL 조회
//! - [`middleware`]: HTTP 미들웨어
//! - [`db`]: SQLite 연결 풀

pub mod db;
pub mod error;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
