use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::classify;
use crate::models::{Product, StockVerdict};

use super::StockChecker;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Static fetch strategy: a single HTTP GET with browser-like headers,
/// classified from the raw HTML.
pub struct HttpChecker {
    client: Client,
}

impl HttpChecker {
    pub fn new(user_agent: &str) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> crate::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl StockChecker for HttpChecker {
    async fn check(&mut self, product: &Product) -> StockVerdict {
        debug!(product = %product.name, url = %product.url, "fetching product page");

        match self.fetch(&product.url).await {
            Ok(body) => classify::classify_static(&body),
            Err(e) => StockVerdict::indeterminate(format!("request failed: {e}")),
        }
    }
}
