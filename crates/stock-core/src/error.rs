//! 시세 데이터 도메인의 에러 타입.
//!
//! 입력 검증과 설정 로딩처럼 I/O와 무관한 실패를 표현합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 시장을 판별할 수 없는 종목 코드
    #[error("Invalid stock code: {0}")]
    InvalidStockCode(String),

    /// YYYYMMDD 형식이 아닌 거래일
    #[error("Invalid trade date: {0}")]
    InvalidTradeDate(String),

    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),
}

/// 핵심 도메인 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 호출자의 입력 때문에 발생한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidStockCode(_) | CoreError::InvalidTradeDate(_)
        )
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(CoreError::InvalidStockCode("123".into()).is_client_error());
        assert!(CoreError::InvalidTradeDate("2025-01-01".into()).is_client_error());
        assert!(!CoreError::Config("missing".into()).is_client_error());
    }

    #[test]
    fn test_error_message() {
        let err = CoreError::InvalidStockCode("123456".to_string());
        assert_eq!(err.to_string(), "Invalid stock code: 123456");
    }
}
