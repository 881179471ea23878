//! 실시간 시가총액 라우트.
//!
//! `GET /api/realtime/mktcap/{stock_code}`
//!
//! 캐시에 유효한 값이 있으면 그대로, 없으면 외부 시세를 조회합니다.
//! 조회 실패 시 만료된 캐시 값으로 대체하지 않습니다.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::warn;

use stock_data::MarketCapLookup;

use crate::error::{quote_error, ApiResult};
use crate::state::AppState;

/// GET /api/realtime/mktcap/{stock_code}
pub async fn get_realtime_mktcap(
    State(state): State<Arc<AppState>>,
    Path(stock_code): Path<String>,
) -> ApiResult<Json<MarketCapLookup>> {
    state
        .market_cap
        .market_cap(&stock_code)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(stock_code = %stock_code, error = %e, "Market cap lookup failed");
            quote_error(&e)
        })
}

/// 실시간 시세 라우터 생성.
pub fn realtime_router() -> Router<Arc<AppState>> {
    Router::new().route("/mktcap/{stock_code}", get(get_realtime_mktcap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_app;
    use crate::routes::test_support::get_json;
    use crate::state::{create_test_state, create_test_state_with_quote_url};
    use axum::http::StatusCode;
    use std::time::Duration;

    const PAYLOAD: &str = "var hq_str_sh600000=\"浦发银行,10.48,10.47,10.50,10.55,10.40,10.49,10.50,1000,10500,0,0,2935216,0\";";

    #[tokio::test]
    async fn test_invalid_code_is_400() {
        let app = create_app(Arc::new(create_test_state()), Duration::from_secs(10));
        let (status, body) = get_json(app, "/api/realtime/mktcap/123456").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid stock code");
        assert_eq!(body["code"], "QUOTE_ERROR");
    }

    #[tokio::test]
    async fn test_fetch_then_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list=sh600000")
            .with_status(200)
            .with_body(PAYLOAD)
            .expect(1)
            .create_async()
            .await;

        let state = create_test_state_with_quote_url(&server.url());
        let app = create_app(Arc::new(state), Duration::from_secs(10));

        let (status, first) = get_json(app.clone(), "/api/realtime/mktcap/600000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["stock_code"], "600000");
        assert_eq!(first["cached"], false);
        let mktcap = first["mktcap"].as_f64().unwrap();
        assert!((mktcap - 10.50 * 2_935_216.0).abs() < 1e-3);
        assert!((first["mktcap_yi"].as_f64().unwrap() - mktcap / 10_000.0).abs() < 1e-6);

        let (status, second) = get_json(app, "/api/realtime/mktcap/600000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["cached"], true);
        assert_eq!(second["mktcap"], first["mktcap"]);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_reply_is_404() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/list=sz000001")
            .with_status(200)
            .with_body("no data")
            .create_async()
            .await;

        let state = create_test_state_with_quote_url(&server.url());
        let app = create_app(Arc::new(state), Duration::from_secs(10));

        let (status, body) = get_json(app, "/api/realtime/mktcap/000001").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Stock not found");
    }

    #[tokio::test]
    async fn test_unreachable_source_is_500() {
        let app = create_app(Arc::new(create_test_state()), Duration::from_secs(10));
        let (status, body) = get_json(app, "/api/realtime/mktcap/600000").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch data");
    }
}
