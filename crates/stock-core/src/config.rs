//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → 환경 변수 순서로 덮어씁니다.
//! 환경 변수는 `STOCK_API__SERVER__PORT=9000`처럼 `STOCK_API` 접두사와 `__` 구분자를 사용합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::{LogConfig, LogFormat};

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "STOCK_API";

/// 설정 파일 경로를 지정하는 환경 변수.
pub const CONFIG_PATH_ENV: &str = "STOCK_API_CONFIG";

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 실시간 시세 설정
    #[serde(default)]
    pub quote: QuoteConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 처리 제한 시간 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 파일 경로
    pub path: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 풀에서 연결을 얻기까지 대기 시간 (초)
    pub acquire_timeout_secs: u64,
    /// 잠긴 데이터베이스에 대한 대기 시간 (초)
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "jia-stk.db".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 10,
            busy_timeout_secs: 5,
        }
    }
}

/// 실시간 시세 조회 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// 시세 API 기본 URL
    pub base_url: String,
    /// 요청에 붙일 Referer 헤더
    pub referer: String,
    /// 요청 제한 시간 (초)
    pub timeout_secs: u64,
    /// 시가총액 캐시 유효 시간 (초)
    pub cache_ttl_secs: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hq.sinajs.cn".to_string(),
            referer: "https://finance.sina.com.cn".to_string(),
            timeout_secs: 5,
            cache_ttl_secs: 300,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 로깅 초기화용 설정으로 변환합니다. 알 수 없는 형식은 pretty로 처리합니다.
    pub fn to_log_config(&self) -> LogConfig {
        let format = self.format.parse().unwrap_or(LogFormat::Pretty);
        LogConfig::new(self.level.clone()).with_format(format)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default(
                "server.request_timeout_secs",
                defaults.server.request_timeout_secs as i64,
            )?
            .set_default("database.path", defaults.database.path)?
            .set_default(
                "database.max_connections",
                defaults.database.max_connections as i64,
            )?
            .set_default(
                "database.acquire_timeout_secs",
                defaults.database.acquire_timeout_secs as i64,
            )?
            .set_default(
                "database.busy_timeout_secs",
                defaults.database.busy_timeout_secs as i64,
            )?
            .set_default("quote.base_url", defaults.quote.base_url)?
            .set_default("quote.referer", defaults.quote.referer)?
            .set_default("quote.timeout_secs", defaults.quote.timeout_secs as i64)?
            .set_default("quote.cache_ttl_secs", defaults.quote.cache_ttl_secs as i64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// `STOCK_API_CONFIG` 또는 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }
}
