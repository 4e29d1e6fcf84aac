use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::classify;
use crate::models::{Product, StockVerdict};
use crate::utils::error::AppError;

use super::{StockChecker, modal};

const PAGE_READY_TIMEOUT: Duration = Duration::from_secs(15);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Dynamic fetch strategy backed by one shared headless Chrome session.
///
/// The browser is launched lazily on first use and reused for every later
/// check. A failed launch fails only the current check; the next dynamic
/// check attempts the launch again.
pub struct BrowserChecker {
    browser: Option<Browser>,
    user_agent: String,
    chrome_binary: Option<PathBuf>,
}

impl BrowserChecker {
    pub fn new(user_agent: &str, chrome_binary: Option<PathBuf>) -> Self {
        Self {
            browser: None,
            user_agent: user_agent.to_string(),
            chrome_binary,
        }
    }

    /// Drop the browser session, killing the Chrome process. Safe to call
    /// when no session was ever started.
    pub fn shutdown(&mut self) {
        if self.browser.take().is_some() {
            info!("headless browser session closed");
        }
    }

    fn launch(&self) -> Result<Browser, AppError> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((1920, 1080)))
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Setup(format!("failed to build launch options: {e}")))?;
        launch_options.path = self.chrome_binary.clone();

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Setup(format!("failed to launch browser: {e}")))?;
        info!("headless browser session started");
        Ok(browser)
    }

    fn ensure_browser(&mut self) -> Result<&Browser, AppError> {
        if self.browser.is_none() {
            self.browser = Some(self.launch()?);
        }
        match &self.browser {
            Some(browser) => Ok(browser),
            None => Err(AppError::Setup("browser session unavailable".to_string())),
        }
    }

    async fn check_inner(&mut self, product: &Product) -> Result<StockVerdict, AppError> {
        let tab = self
            .ensure_browser()?
            .new_tab()
            .map_err(|e| AppError::Fetch(format!("failed to open tab: {e}")))?;

        let result = drive_tab(&tab, &self.user_agent, product).await;
        let _ = tab.close(true);
        result
    }
}

async fn drive_tab(tab: &Tab, user_agent: &str, product: &Product) -> Result<StockVerdict, AppError> {
    tab.set_user_agent(user_agent, None, None)
        .map_err(|e| AppError::Fetch(format!("failed to set user agent: {e}")))?;
    tab.navigate_to(&product.url)
        .map_err(|e| AppError::Fetch(format!("navigation failed: {e}")))?;
    tab.wait_until_navigated()
        .map_err(|e| AppError::Fetch(format!("page load failed: {e}")))?;

    modal::resolve_pincode_modal(tab, product).await?;
    wait_for_page_ready(tab, PAGE_READY_TIMEOUT).await?;

    let alert_text = match tab.find_element(classify::RENDERED_ALERT_SELECTOR) {
        Ok(element) => Some(
            element
                .get_inner_text()
                .map_err(|e| AppError::Classify(format!("failed to read alert text: {e}")))?,
        ),
        // Absence of the alert element is the in-stock signal
        Err(_) => None,
    };
    debug!(product = %product.name, alert_present = alert_text.is_some(), "rendered page inspected");

    Ok(classify::classify_rendered(alert_text.as_deref()))
}

/// Bounded poll for document.readyState == "complete".
async fn wait_for_page_ready(tab: &Tab, timeout: Duration) -> Result<(), AppError> {
    let deadline = Instant::now() + timeout;

    loop {
        let ready = tab
            .evaluate("document.readyState", false)
            .ok()
            .and_then(|object| object.value)
            .and_then(|value| value.as_str().map(|state| state == "complete"))
            .unwrap_or(false);
        if ready {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AppError::Fetch(format!(
                "page did not finish loading within {}s",
                timeout.as_secs()
            )));
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[async_trait]
impl StockChecker for BrowserChecker {
    async fn check(&mut self, product: &Product) -> StockVerdict {
        debug!(product = %product.name, url = %product.url, "checking with headless browser");

        match self.check_inner(product).await {
            Ok(verdict) => verdict,
            Err(e) => StockVerdict::indeterminate(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_starts_without_a_session() {
        let checker = BrowserChecker::new("TestAgent/1.0", None);
        assert!(checker.browser.is_none());
    }

    #[test]
    fn test_shutdown_is_idempotent_without_session() {
        let mut checker = BrowserChecker::new("TestAgent/1.0", None);
        checker.shutdown();
        checker.shutdown();
        assert!(checker.browser.is_none());
    }
}
