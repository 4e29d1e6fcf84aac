use async_trait::async_trait;

use crate::models::{Product, StockVerdict};

pub mod browser;
pub mod http;
pub mod modal;

pub use browser::BrowserChecker;
pub use http::HttpChecker;

/// A page-fetch strategy: retrieve the product page, work around any
/// blocking overlay, and classify what it shows.
///
/// `check` never errors out; every failure is folded into an
/// `Indeterminate` verdict carrying the failure reason.
#[async_trait]
pub trait StockChecker: Send {
    async fn check(&mut self, product: &Product) -> StockVerdict;
}
