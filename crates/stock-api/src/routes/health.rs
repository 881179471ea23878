//! 헬스 체크 endpoint.
//!
//! 서버 상태 확인을 위한 헬스 체크 엔드포인트를 제공합니다.
//! 서비스 자체가 응답 가능하면 데이터베이스 상태와 무관하게 200을 반환합니다.

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 전체 서비스 상태 ("healthy" | "degraded")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 데이터베이스 연결 상태 ("up" | "down")
    pub database: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
}

/// 헬스 체크.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db_up = state.is_db_healthy().await;
    if !db_up {
        warn!("Database health check failed");
    }

    Json(HealthResponse {
        status: if db_up { "healthy" } else { "degraded" }.to_string(),
        version: state.version.clone(),
        database: if db_up { "up" } else { "down" }.to_string(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::state::create_test_state;

    async fn call(state: AppState) -> (StatusCode, HealthResponse) {
        let app = Router::new()
            .route("/health", get(health_check))
            .with_state(Arc::new(state));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_returns_json() {
        let (status, health) = call(create_test_state()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, "up");
        assert!(!health.version.is_empty());
        assert!(health.uptime_secs >= 0);
    }

    #[tokio::test]
    async fn test_health_with_closed_pool_is_degraded() {
        let state = create_test_state();
        state.db_pool.close().await;

        let (status, health) = call(state).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "degraded");
        assert_eq!(health.database, "down");
    }
}
