//! 주식 시세 API 서버.
//!
//! 설정을 읽어 SQLite 풀과 시가총액 캐시를 준비한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use stock_api::db::connect_pool;
use stock_api::routes::create_app;
use stock_api::state::AppState;
use stock_core::{init_logging, AppConfig};
use stock_data::{MarketCapService, QuoteCache, SinaQuoteFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(config.logging.to_log_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting stock API server...");

    let pool = connect_pool(&config.database).await.map_err(|e| {
        error!(
            path = %config.database.path,
            error = %e,
            "데이터베이스를 열 수 없습니다. STOCK_API__DATABASE__PATH 설정을 확인하세요."
        );
        e
    })?;

    let fetcher = SinaQuoteFetcher::new(&config.quote)?;
    let cache = QuoteCache::new(Duration::from_secs(config.quote.cache_ttl_secs));
    let market_cap = MarketCapService::new(Arc::new(fetcher), cache);

    let state = Arc::new(AppState::new(pool, market_cap));
    info!(
        version = %state.version,
        quote_ttl_secs = state.market_cap.cache().ttl().as_secs(),
        "Application state initialized"
    );

    let app = create_app(
        state,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
