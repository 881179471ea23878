//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! ```json
//! { "error": "Stock not found", "code": "NOT_FOUND" }
//! ```

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::error;

use stock_core::CoreError;
use stock_data::QuoteError;

/// 통합 API 에러 응답.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error: String,
    /// 에러 코드 (예: "DB_ERROR", "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.error)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// 핸들러가 반환하는 에러 (상태 코드 + JSON 본문).
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

// ==================== 에러 생성 헬퍼 ====================

fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 400 Bad Request.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
}

/// 403 Forbidden.
pub fn forbidden(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "FORBIDDEN", message)
}

/// 404 Not Found.
pub fn not_found(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

/// 500 Internal Server Error.
pub fn internal_error(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
}

/// 저장소 에러를 기록하고 일반화된 500 응답으로 바꿉니다.
///
/// 원본 메시지는 로그에만 남깁니다.
pub fn db_error(context: &str, err: sqlx::Error) -> ApiError {
    error!(context, error = %err, "Database query failed");
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "DB_ERROR",
        "Database query failed",
    )
}

/// 시세 조회 에러를 상태 코드와 공개 메시지로 변환합니다.
pub fn quote_error(err: &QuoteError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    api_error(status, "QUOTE_ERROR", err.public_message())
}

/// 도메인 에러 변환. 입력 검증 실패는 400, 나머지는 500.
pub fn core_error(err: &CoreError) -> ApiError {
    if err.is_client_error() {
        bad_request(err.to_string())
    } else {
        error!(error = %err, "Unexpected core error");
        internal_error(err.to_string())
    }
}

// ==================== 쿼리 추출기 ====================

/// 쿼리 스트링 추출기.
///
/// 역직렬화 실패를 axum 기본 평문 응답 대신 400 JSON 에러로 반환합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::try_from_uri(&parts.uri)
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| bad_request(rejection.body_text()))
    }
}
