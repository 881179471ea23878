//! Sina 금융 실시간 시세.
//!
//! `GET {base_url}/list=sh600000` 요청은 다음 형태의 본문을 반환합니다:
//!
//! ```text
//! var hq_str_sh600000="浦发银行,10.48,10.50,10.55,...";
//! ```
//!
//! 첫 번째와 마지막 큰따옴표 사이를 쉼표로 나눈 뒤
//! 3번 필드(현재가)와 12번 필드(총 주식수, 만 주)를 사용합니다.
//! `Referer` 헤더가 없으면 요청이 거부됩니다.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, warn};

use stock_core::{market_cap_wan, wan_to_yi, Exchange, QuoteConfig};

use super::{MarketCapQuote, QuoteSource};
use crate::error::{QuoteError, Result};

const PRICE_FIELD: usize = 3;
const TOTAL_SHARES_FIELD: usize = 12;

/// Sina 실시간 시세 조회기.
#[derive(Debug, Clone)]
pub struct SinaQuoteFetcher {
    client: Client,
    base_url: String,
    referer: String,
}

impl SinaQuoteFetcher {
    /// 설정으로 생성합니다.
    pub fn new(config: &QuoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuoteError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
        })
    }

    /// 시세 요청 URL.
    fn quote_url(&self, quote_symbol: &str) -> String {
        format!("{}/list={}", self.base_url, quote_symbol)
    }

    async fn fetch_body(&self, quote_symbol: &str) -> Result<String> {
        let response = self
            .client
            .get(self.quote_url(quote_symbol))
            .header(header::REFERER, &self.referer)
            .send()
            .await
            .map_err(QuoteError::Fetch)?;

        let bytes = response.bytes().await.map_err(QuoteError::Read)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[async_trait]
impl QuoteSource for SinaQuoteFetcher {
    fn name(&self) -> &str {
        "Sina"
    }

    async fn fetch_market_cap(&self, stock_code: &str) -> Result<MarketCapQuote> {
        let exchange = Exchange::from_stock_code(stock_code)
            .map_err(|_| QuoteError::InvalidCode(stock_code.to_string()))?;
        let quote_symbol = exchange.prefixed(stock_code);

        let body = self.fetch_body(&quote_symbol).await.inspect_err(|e| {
            warn!(stock_code, error = %e, "Quote request failed");
        })?;

        let quote = parse_quote_payload(&body).inspect_err(|e| {
            warn!(stock_code, error = %e, "Cannot parse quote payload");
        })?;

        debug!(
            stock_code,
            price = quote.price,
            shares_wan = quote.total_shares_wan,
            mktcap_yi = wan_to_yi(quote.mktcap_wan),
            "Fetched market cap"
        );

        Ok(quote)
    }
}

/// Sina 응답 본문에서 시가총액을 계산합니다.
pub fn parse_quote_payload(body: &str) -> Result<MarketCapQuote> {
    if !body.contains('=') {
        return Err(QuoteError::NotFound);
    }

    let (start, end) = match (body.find('"'), body.rfind('"')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(QuoteError::Parse),
    };

    let fields: Vec<&str> = body[start + 1..end].split(',').collect();
    if fields.len() <= TOTAL_SHARES_FIELD {
        return Err(QuoteError::InsufficientFields(fields.len()));
    }

    let raw_price = fields[PRICE_FIELD];
    let raw_shares = fields[TOTAL_SHARES_FIELD];
    let invalid = || QuoteError::InvalidMarketData {
        price: raw_price.to_string(),
        shares: raw_shares.to_string(),
    };

    let price = raw_price.parse::<f64>().map_err(|_| invalid())?;
    let total_shares_wan = raw_shares.parse::<f64>().map_err(|_| invalid())?;
    if !(price.is_finite() && price > 0.0 && total_shares_wan.is_finite() && total_shares_wan > 0.0)
    {
        return Err(invalid());
    }

    Ok(MarketCapQuote {
        price,
        total_shares_wan,
        mktcap_wan: market_cap_wan(price, total_shares_wan),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "var hq_str_sh600000=\"PFYH,10.48,10.50,10.55,10.60,10.40,10.54,10.55,1000,10550,200,2935208,2935208,10.54\";\n";

    fn fetcher(base_url: &str) -> SinaQuoteFetcher {
        SinaQuoteFetcher::new(&QuoteConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_parse_valid_payload() {
        let quote = parse_quote_payload(SAMPLE).unwrap();
        assert_eq!(quote.price, 10.55);
        assert_eq!(quote.total_shares_wan, 2_935_208.0);
        assert!((quote.mktcap_wan - 10.55 * 2_935_208.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_without_equals_is_not_found() {
        assert!(matches!(
            parse_quote_payload("FAILED"),
            Err(QuoteError::NotFound)
        ));
    }

    #[test]
    fn test_parse_without_quotes_fails() {
        assert!(matches!(
            parse_quote_payload("var hq_str_sh600000=;"),
            Err(QuoteError::Parse)
        ));
        assert!(matches!(
            parse_quote_payload("var hq_str_sh600000=\";"),
            Err(QuoteError::Parse)
        ));
    }

    #[test]
    fn test_parse_empty_quote_is_insufficient() {
        assert!(matches!(
            parse_quote_payload("var hq_str_sh699999=\"\";"),
            Err(QuoteError::InsufficientFields(1))
        ));
    }

    #[test]
    fn test_parse_non_positive_values() {
        let zero_price = "var x=\"a,b,c,0,e,f,g,h,i,j,k,l,1000\";";
        assert!(matches!(
            parse_quote_payload(zero_price),
            Err(QuoteError::InvalidMarketData { .. })
        ));

        let bad_shares = "var x=\"a,b,c,10.5,e,f,g,h,i,j,k,l,n/a\";";
        assert!(matches!(
            parse_quote_payload(bad_shares),
            Err(QuoteError::InvalidMarketData { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_code_skips_request() {
        let source = fetcher("http://127.0.0.1:9");
        let err = source.fetch_market_cap("123456").await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidCode(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_fetch_sends_referer_and_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list=sh600000")
            .match_header("referer", "https://finance.sina.com.cn")
            .with_status(200)
            .with_body(SAMPLE)
            .create_async()
            .await;

        let source = fetcher(&server.url());
        let quote = source.fetch_market_cap("600000").await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.price, 10.55);
    }

    #[tokio::test]
    async fn test_fetch_beijing_prefix() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list=bj920003")
            .with_status(200)
            .with_body("var hq_str_bj920003=\"\";")
            .create_async()
            .await;

        let source = fetcher(&server.url());
        let err = source.fetch_market_cap("920003").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.public_message(), "Insufficient data");
    }

    #[tokio::test]
    async fn test_fetch_transport_failure() {
        // 닫힌 포트
        let source = fetcher("http://127.0.0.1:1");
        let err = source.fetch_market_cap("000001").await.unwrap_err();
        assert!(matches!(err, QuoteError::Fetch(_)));
        assert_eq!(err.status_code(), 500);
    }
}
