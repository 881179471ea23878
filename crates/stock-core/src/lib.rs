//! # Stock Core
//!
//! 주식 시세 API의 핵심 도메인 모델과 분석 규칙을 제공합니다.
//!
//! 이 크레이트는 I/O 없이 다음을 정의합니다:
//! - 종목, 일별 스냅샷, 일봉 이력 레코드
//! - 거래소 판별 및 심볼 접두사 규칙
//! - 다일 등락 집계와 전략 스캔 후처리 규칙
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
