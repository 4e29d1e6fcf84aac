use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::models::Product;

pub mod email;
pub mod telegram;

pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

/// A notify-worthy stock event, handed to every configured channel.
#[derive(Debug, Clone)]
pub struct StockAlert {
    pub product_name: String,
    pub product_url: String,
    pub reason: String,
    pub checked_at: DateTime<Local>,
}

impl StockAlert {
    pub fn new(product: &Product, reason: &str) -> Self {
        Self {
            product_name: product.name.clone(),
            product_url: product.url.clone(),
            reason: reason.to_string(),
            checked_at: Local::now(),
        }
    }

    pub fn timestamp(&self) -> String {
        self.checked_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct NotificationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent() -> Self {
        Self { success: true, error: None }
    }

    /// The channel chose not to deliver (e.g. not configured). Not an
    /// error; carries no error text.
    pub fn skipped() -> Self {
        Self { success: false, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// A notification channel. Channels are independent and best-effort: a
/// failure is reported in the result and logged, never propagated, so one
/// broken channel cannot block another.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    async fn notify(&self, alert: &StockAlert) -> NotificationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_carries_product_fields() {
        let product = Product {
            name: "Widget".to_string(),
            url: "https://shop.example.com/widget".to_string(),
            pincode: None,
            use_browser: false,
            pincode_selectors: Default::default(),
        };

        let alert = StockAlert::new(&product, "no 'Sold Out' alert found, assuming in stock");

        assert_eq!(alert.product_name, "Widget");
        assert_eq!(alert.product_url, "https://shop.example.com/widget");
        assert!(alert.reason.contains("assuming in stock"));
        // %Y-%m-%d %H:%M:%S
        assert_eq!(alert.timestamp().len(), 19);
    }

    #[test]
    fn test_result_constructors() {
        assert!(NotificationResult::sent().success);
        let skipped = NotificationResult::skipped();
        assert!(!skipped.success);
        assert!(skipped.error.is_none());
        let failed = NotificationResult::failed("connection refused");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("connection refused"));
    }
}
