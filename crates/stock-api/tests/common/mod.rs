//! 통합 테스트 공용 도구.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use stock_api::{create_app, db::memory_pool, AppState};
use stock_core::QuoteConfig;
use stock_data::{MarketCapService, QuoteCache, SinaQuoteFetcher};

const SCHEMA: &str = r#"
CREATE TABLE stock_list (
    ts_code TEXT, symbol TEXT, name TEXT, area TEXT,
    industry TEXT, list_date TEXT, pinyin TEXT
);

CREATE TABLE stock_history (
    id INTEGER PRIMARY KEY,
    stock_code TEXT, stock_name TEXT, exchange TEXT, trade_date TEXT,
    open REAL, high REAL, low REAL, close REAL,
    volume INTEGER, amount REAL, import_time TEXT
);

CREATE TABLE stock_daily_20250805 (
    symbol TEXT, code TEXT, name TEXT, trade REAL, pricechange REAL,
    changepercent REAL, buy REAL, sell REAL, settlement REAL,
    open REAL, high REAL, low REAL, volume INTEGER, amount INTEGER,
    ticktime TEXT, per REAL, pb REAL, mktcap REAL, nmc REAL,
    turnoverratio REAL, dump_time TEXT
);

CREATE TABLE stock_daily_20250806 (
    symbol TEXT, code TEXT, name TEXT, trade REAL, pricechange REAL,
    changepercent REAL, buy REAL, sell REAL, settlement REAL,
    open REAL, high REAL, low REAL, volume INTEGER, amount INTEGER,
    ticktime TEXT, per REAL, pb REAL, mktcap REAL, nmc REAL,
    turnoverratio REAL, dump_time TEXT
);

CREATE TABLE stock_daily_summary (symbol TEXT);
"#;

// 000001 종가: 10 → 11 → 9 → 9.5 (08-01, 08-04, 08-05, 08-06)
const DATA: &str = r#"
INSERT INTO stock_list VALUES
    ('000001.SZ', '000001', '平安银行', '深圳', '银行', '19910403', 'payh'),
    ('600000.SH', '600000', '浦发银行', '上海', '银行', '19991110', 'pfyh');

INSERT INTO stock_daily_20250805 VALUES
    ('sz000001', '000001', '平安银行', 9.0, -2.0, -18.18, 9.0, 9.01, 11.0, 11.0, 11.0, 8.9, 1000, 9000, '15:00:00', 4.0, 0.5, 180000.0, 170000.0, 1.0, '2025-08-05 15:30:00');

INSERT INTO stock_daily_20250806 VALUES
    ('sz000001', '000001', '平安银行', 9.5, 0.5, 5.56, 9.5, 9.51, 9.0, 9.0, 9.6, 9.0, 3000, 28500, '15:00:00', 4.1, 0.5, 190000.0, 180000.0, 6.0, '2025-08-06 15:30:00'),
    ('sh600000', '600000', '浦发银行', 10.1, 0.1, 1.0, 10.1, 10.11, 10.0, 10.0, 10.2, 9.9, 5000, 50500, '15:00:00', 5.0, 0.5, 3000000.0, 2900000.0, 0.3, '2025-08-06 15:30:00');

INSERT INTO stock_history (stock_code, stock_name, exchange, trade_date, open, high, low, close, volume, amount, import_time) VALUES
    ('000001', '平安银行', 'SZ', '20250801', 10.0, 10.1, 9.9, 10.0, 1000, 10000.0, '2025-08-07 09:00:00'),
    ('000001', '平安银行', 'SZ', '20250804', 10.0, 11.0, 10.0, 11.0, 1000, 11000.0, '2025-08-07 09:00:00'),
    ('000001', '平安银行', 'SZ', '20250805', 11.0, 11.0, 8.9, 9.0, 1000, 9000.0, '2025-08-07 09:00:00'),
    ('000001', '平安银行', 'SZ', '20250806', 9.0, 9.6, 9.0, 9.5, 3000, 28500.0, '2025-08-07 09:00:00');
"#;

/// 지정한 시세 서버를 사용하는 앱. 데이터는 비어 있습니다.
pub fn empty_app(quote_url: &str) -> (Router, sqlx::SqlitePool) {
    let pool = memory_pool().expect("in-memory pool");
    let fetcher = SinaQuoteFetcher::new(&QuoteConfig {
        base_url: quote_url.to_string(),
        timeout_secs: 2,
        ..Default::default()
    })
    .expect("quote fetcher");
    let market_cap = MarketCapService::new(
        Arc::new(fetcher),
        QuoteCache::new(Duration::from_secs(300)),
    );

    let state = AppState::new(pool.clone(), market_cap);
    (create_app(Arc::new(state), Duration::from_secs(10)), pool)
}

/// 8월 시나리오 데이터가 채워진 앱.
pub async fn seeded_app(quote_url: &str) -> Router {
    let (app, pool) = empty_app(quote_url);
    sqlx::raw_sql(SCHEMA).execute(&pool).await.expect("schema");
    sqlx::raw_sql(DATA).execute(&pool).await.expect("data");
    app
}

/// 요청을 보내고 상태 코드와 JSON 본문을 반환합니다.
pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri).await
}
