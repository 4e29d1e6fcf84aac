use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::checkers::{BrowserChecker, HttpChecker, StockChecker};
use crate::config::AppConfig;
use crate::models::{Product, StockVerdict};
use crate::notify::{EmailNotifier, Notifier, StockAlert, TelegramNotifier};
use crate::tracker::StatusTracker;

const PRODUCT_PAUSE: Duration = Duration::from_secs(2);
const ERROR_COOLDOWN: Duration = Duration::from_secs(60);

/// Drives the check cycle: fetch, classify, track, notify.
///
/// Owns the long-lived browser session (inside `BrowserChecker`), the
/// status tracker and the notifier set. Products are checked sequentially
/// in declared order; there is no parallelism anywhere in the cycle.
pub struct Monitor {
    config: AppConfig,
    http: HttpChecker,
    browser: BrowserChecker,
    notifiers: Vec<Box<dyn Notifier>>,
    tracker: StatusTracker,
}

impl Monitor {
    pub fn new(config: AppConfig) -> crate::Result<Self> {
        let notifiers: Vec<Box<dyn Notifier>> = vec![
            Box::new(EmailNotifier::new(config.email.clone())),
            Box::new(TelegramNotifier::new(config.telegram.clone())),
        ];
        Self::with_notifiers(config, notifiers)
    }

    /// Build a monitor with an explicit notifier set.
    pub fn with_notifiers(
        config: AppConfig,
        notifiers: Vec<Box<dyn Notifier>>,
    ) -> crate::Result<Self> {
        let http = HttpChecker::new(&config.user_agent)?;
        let browser = BrowserChecker::new(&config.user_agent, config.chrome_binary());

        Ok(Self {
            config,
            http,
            browser,
            notifiers,
            tracker: StatusTracker::new(),
        })
    }

    /// One pass over every product without consulting the tracker: every
    /// in-stock verdict is notify-worthy. For cron-style invocations.
    pub async fn run_once(&mut self) {
        info!("starting single stock check");

        let products = self.config.products.clone();
        for product in &products {
            info!(product = %product.name, "checking");
            let verdict = self.checker_for(product).check(product).await;

            match &verdict {
                StockVerdict::InStock { reason } => {
                    info!(product = %product.name, "ALERT: product is in stock");
                    self.dispatch_alert(product, reason).await;
                }
                StockVerdict::OutOfStock { .. } => {
                    info!(product = %product.name, "product is out of stock");
                }
                StockVerdict::Indeterminate { reason } => {
                    warn!(product = %product.name, %reason, "could not determine stock status");
                }
            }

            tokio::time::sleep(PRODUCT_PAUSE).await;
        }

        self.browser.shutdown();
        info!("single stock check finished");
    }

    /// Check forever at the configured interval, alerting only on
    /// transitions into stock. Returns when interrupted; the browser
    /// session is released on the way out.
    pub async fn run(&mut self) {
        info!(interval = self.config.check_interval, "starting continuous stock monitor");

        loop {
            match self.check_cycle().await {
                Ok(()) => {
                    info!(seconds = self.config.check_interval, "waiting before next check");
                    if self
                        .sleep_or_interrupt(Duration::from_secs(self.config.check_interval))
                        .await
                    {
                        break;
                    }
                }
                Err(e) => {
                    error!(error = %e, "unexpected error during check cycle");
                    if self.sleep_or_interrupt(ERROR_COOLDOWN).await {
                        break;
                    }
                }
            }
        }

        self.browser.shutdown();
        info!("monitor stopped");
    }

    /// One tracker-aware pass over every product.
    pub async fn check_cycle(&mut self) -> Result<()> {
        let products = self.config.products.clone();
        for product in &products {
            info!(product = %product.name, "checking");
            let verdict = self.checker_for(product).check(product).await;

            if let StockVerdict::Indeterminate { reason } = &verdict {
                warn!(product = %product.name, %reason, "could not determine stock status");
            } else if self.tracker.should_notify(&product.name, &verdict) {
                info!(product = %product.name, "ALERT: product is now in stock");
                self.dispatch_alert(product, verdict.reason()).await;
            } else if verdict.is_in_stock() {
                info!(product = %product.name, "product still in stock, already alerted");
            } else {
                info!(product = %product.name, "product is out of stock");
            }

            tokio::time::sleep(PRODUCT_PAUSE).await;
        }

        Ok(())
    }

    fn checker_for(&mut self, product: &Product) -> &mut dyn StockChecker {
        if product.use_browser {
            &mut self.browser
        } else {
            &mut self.http
        }
    }

    async fn dispatch_alert(&self, product: &Product, reason: &str) {
        let alert = StockAlert::new(product, reason);

        for notifier in &self.notifiers {
            let result = notifier.notify(&alert).await;
            if result.success {
                info!(channel = notifier.name(), product = %product.name, "notification sent");
            } else if let Some(error) = result.error {
                warn!(channel = notifier.name(), product = %product.name, %error, "notification failed");
            } else {
                debug!(channel = notifier.name(), "notification channel skipped");
            }
        }
    }

    /// Sleep for `duration`; true means an interrupt arrived instead.
    async fn sleep_or_interrupt(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, stopping monitor");
                true
            }
        }
    }
}
