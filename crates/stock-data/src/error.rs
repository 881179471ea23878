//! 실시간 시세 조회 오류 타입.

use thiserror::Error;

/// 실시간 시가총액 조회 오류.
///
/// 각 변형은 호출자에게 서로 다른 상태 코드로 전달됩니다.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// 시장을 판별할 수 없는 종목 코드
    #[error("Invalid stock code: {0}")]
    InvalidCode(String),

    /// HTTP 클라이언트 생성 실패
    #[error("HTTP client error: {0}")]
    Client(String),

    /// 요청 전송 실패 (연결 오류, 타임아웃)
    #[error("Failed to fetch data: {0}")]
    Fetch(#[source] reqwest::Error),

    /// 응답 본문 읽기 실패
    #[error("Failed to read data: {0}")]
    Read(#[source] reqwest::Error),

    /// 응답에 `=`가 없음
    #[error("Stock not found")]
    NotFound,

    /// 따옴표로 둘러싸인 구간을 찾을 수 없음
    #[error("Failed to parse data")]
    Parse,

    /// 필드 수 부족
    #[error("Insufficient data: got {0} fields")]
    InsufficientFields(usize),

    /// 가격/주식수를 해석할 수 없거나 0 이하
    #[error("Invalid market data: price={price}, shares={shares}")]
    InvalidMarketData { price: String, shares: String },
}

impl QuoteError {
    /// 호출자에게 돌려줄 HTTP 상태 코드.
    pub fn status_code(&self) -> u16 {
        match self {
            QuoteError::InvalidCode(_) => 400,
            QuoteError::NotFound
            | QuoteError::InsufficientFields(_)
            | QuoteError::InvalidMarketData { .. } => 404,
            QuoteError::Client(_)
            | QuoteError::Fetch(_)
            | QuoteError::Read(_)
            | QuoteError::Parse => 500,
        }
    }

    /// 호출자에게 노출할 메시지. 내부 원인은 포함하지 않습니다.
    pub fn public_message(&self) -> &'static str {
        match self {
            QuoteError::InvalidCode(_) => "Invalid stock code",
            QuoteError::Client(_) | QuoteError::Fetch(_) => "Failed to fetch data",
            QuoteError::Read(_) => "Failed to read data",
            QuoteError::NotFound => "Stock not found",
            QuoteError::Parse => "Failed to parse data",
            QuoteError::InsufficientFields(_) => "Insufficient data",
            QuoteError::InvalidMarketData { .. } => "Invalid market data",
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
