use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::TelegramSettings;
use crate::utils::error::AppError;

use super::{NotificationResult, Notifier, StockAlert};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts Markdown-formatted alerts to the Telegram Bot API. An unset bot
/// token or chat id disables the channel: sends are skipped without any
/// network traffic.
pub struct TelegramNotifier {
    client: Client,
    settings: TelegramSettings,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(settings: TelegramSettings) -> Self {
        Self::with_api_base(settings, TELEGRAM_API_BASE)
    }

    /// Point the notifier at a different API host (proxies, tests).
    pub fn with_api_base(settings: TelegramSettings, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            settings,
            api_base: api_base.into(),
        }
    }

    pub fn format_message(alert: &StockAlert) -> String {
        format!(
            "*STOCK ALERT*\n\n*{}* is now available!\n\n[Buy Now]({})\nStatus: {}\nChecked at: {}",
            alert.product_name,
            alert.product_url,
            alert.reason,
            alert.timestamp()
        )
    }

    async fn deliver(&self, token: &str, chat_id: &str, alert: &StockAlert) -> crate::Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        let payload = json!({
            "chat_id": chat_id,
            "text": Self::format_message(alert),
            "parse_mode": "Markdown",
            "disable_web_page_preview": false,
        });

        let response = self
            .client
            .post(&url)
            .timeout(SEND_TIMEOUT)
            .json(&payload)
            .send()
            .await
            .map_err(AppError::Http)?;
        response.error_for_status().map_err(AppError::Http)?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn notify(&self, alert: &StockAlert) -> NotificationResult {
        let (Some(token), Some(chat_id)) =
            (self.settings.bot_token.as_deref(), self.settings.chat_id.as_deref())
        else {
            debug!("telegram channel not configured, skipping");
            return NotificationResult::skipped();
        };

        match self.deliver(token, chat_id, alert).await {
            Ok(()) => {
                info!(product = %alert.product_name, "telegram notification sent");
                NotificationResult::sent()
            }
            Err(e) => {
                error!(product = %alert.product_name, error = %e, "failed to send telegram notification");
                NotificationResult::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn test_alert() -> StockAlert {
        let product = Product {
            name: "Widget".to_string(),
            url: "https://shop.example.com/widget".to_string(),
            pincode: None,
            use_browser: false,
            pincode_selectors: Default::default(),
        };
        StockAlert::new(&product, "no 'Sold Out' alert found, assuming in stock")
    }

    #[test]
    fn test_message_contains_name_link_and_reason() {
        let message = TelegramNotifier::format_message(&test_alert());

        assert!(message.contains("*Widget*"));
        assert!(message.contains("[Buy Now](https://shop.example.com/widget)"));
        assert!(message.contains("assuming in stock"));
    }

    #[tokio::test]
    async fn test_unconfigured_channel_is_skipped() {
        let notifier = TelegramNotifier::new(TelegramSettings::default());

        let result = notifier.notify(&test_alert()).await;

        assert!(!result.success);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_partial_configuration_is_skipped() {
        let notifier = TelegramNotifier::new(TelegramSettings {
            bot_token: Some("123:abc".to_string()),
            chat_id: None,
        });

        let result = notifier.notify(&test_alert()).await;

        assert!(!result.success);
        assert!(result.error.is_none());
    }
}
