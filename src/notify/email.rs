use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{error, info, warn};

use crate::config::EmailSettings;
use crate::utils::error::AppError;

use super::{NotificationResult, Notifier, StockAlert};

/// Sends plaintext stock alerts over an authenticated STARTTLS SMTP
/// session. The transport is built per send; there is no connection reuse.
pub struct EmailNotifier {
    settings: EmailSettings,
}

impl EmailNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    pub fn format_subject(alert: &StockAlert) -> String {
        format!("STOCK ALERT: {} is available!", alert.product_name)
    }

    pub fn format_body(alert: &StockAlert) -> String {
        format!(
            "The product '{}' is now available!\n\n\
             Product URL: {}\n\
             Status: {}\n\
             Checked at: {}\n\n\
             Visit the URL to buy it now.\n",
            alert.product_name,
            alert.product_url,
            alert.reason,
            alert.timestamp()
        )
    }

    fn deliver(&self, alert: &StockAlert) -> crate::Result<()> {
        let (Some(sender), Some(password), Some(recipient)) = (
            self.settings.sender_email.as_deref(),
            self.settings.sender_password.as_deref(),
            self.settings.recipient_email.as_deref(),
        ) else {
            return Err(AppError::Notification(
                "missing SMTP credentials or addresses".to_string(),
            ));
        };

        let message = Message::builder()
            .from(format!("Stock Bot <{sender}>")
                .parse()
                .map_err(|e| AppError::Notification(format!("invalid sender address: {e}")))?)
            .to(recipient
                .parse()
                .map_err(|e| AppError::Notification(format!("invalid recipient address: {e}")))?)
            .subject(Self::format_subject(alert))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::format_body(alert))
            .map_err(|e| AppError::Notification(format!("failed to build message: {e}")))?;

        let mailer = SmtpTransport::starttls_relay(&self.settings.smtp_server)
            .map_err(|e| AppError::Notification(format!("SMTP relay setup failed: {e}")))?
            .port(self.settings.smtp_port)
            .credentials(Credentials::new(sender.to_string(), password.to_string()))
            .build();

        mailer
            .send(&message)
            .map_err(|e| AppError::Notification(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, alert: &StockAlert) -> NotificationResult {
        if !self.settings.is_complete() {
            warn!("email channel is not fully configured, cannot send");
            return NotificationResult::failed("missing SMTP credentials or addresses");
        }

        match self.deliver(alert) {
            Ok(()) => {
                info!(product = %alert.product_name, "email notification sent");
                NotificationResult::sent()
            }
            Err(e) => {
                error!(product = %alert.product_name, error = %e, "failed to send email notification");
                NotificationResult::failed(e.to_string())
            }
        }
    }
}
