use std::time::{Duration, Instant};

use headless_chrome::Tab;
use tracing::{debug, info, warn};

use crate::models::Product;
use crate::utils::error::AppError;

const MODAL_VISIBLE_TIMEOUT: Duration = Duration::from_secs(5);
const INPUT_READY_TIMEOUT: Duration = Duration::from_secs(5);
const DROPDOWN_MATCH_TIMEOUT: Duration = Duration::from_secs(10);
const MODAL_DISMISS_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE_DELAY: Duration = Duration::from_secs(2);
const DISMISS_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The pincode to type for this product, if modal handling applies at all.
pub fn configured_pincode(product: &Product) -> Option<&str> {
    product.pincode.as_deref().filter(|p| !p.is_empty())
}

fn dropdown_xpath(pincode: &str) -> String {
    format!("//p[contains(@class, 'item-name') and text()='{pincode}']")
}

/// Clear the blocking location/pincode overlay when the page shows one.
///
/// A modal that never appears is the steady state after the first
/// successful dismissal and is treated as success; only interaction
/// failures on a confirmed-present modal are errors. Errors here make the
/// whole check Indeterminate, they never abort the monitor.
pub async fn resolve_pincode_modal(tab: &Tab, product: &Product) -> Result<(), AppError> {
    let Some(pincode) = configured_pincode(product) else {
        return Ok(());
    };
    let selectors = &product.pincode_selectors;

    // Presence probe; a missing modal is not an error.
    if tab
        .wait_for_element_with_custom_timeout(&selectors.modal, MODAL_VISIBLE_TIMEOUT)
        .is_err()
    {
        debug!(product = %product.name, "no active pincode modal found");
        return Ok(());
    }
    info!(product = %product.name, "pincode modal detected");

    let input = tab
        .wait_for_element_with_custom_timeout(&selectors.input, INPUT_READY_TIMEOUT)
        .map_err(|e| AppError::Modal(format!("pincode input not interactable: {e}")))?;
    input
        .click()
        .map_err(|e| AppError::Modal(format!("failed to focus pincode input: {e}")))?;
    input
        .type_into(pincode)
        .map_err(|e| AppError::Modal(format!("failed to enter pincode: {e}")))?;
    debug!(pincode, "entered pincode");

    // Best-effort: the widget sometimes commits without a dropdown pick.
    match tab.wait_for_xpath_with_custom_timeout(&dropdown_xpath(pincode), DROPDOWN_MATCH_TIMEOUT) {
        Ok(item) => {
            item.click()
                .map_err(|e| AppError::Modal(format!("failed to select dropdown match: {e}")))?;
            debug!(pincode, "selected matching pincode from dropdown");
        }
        Err(_) => {
            warn!(pincode, "no dropdown match for pincode, proceeding without it");
        }
    }

    match tab.find_element(&selectors.submit_button) {
        Ok(submit) => {
            submit
                .click()
                .map_err(|e| AppError::Modal(format!("failed to click modal submit: {e}")))?;
            debug!("clicked modal submit button");
        }
        Err(_) => {
            // No dedicated submit control; commit on the input itself.
            input
                .focus()
                .map_err(|e| AppError::Modal(format!("failed to refocus pincode input: {e}")))?;
            tab.press_key("Enter")
                .map_err(|e| AppError::Modal(format!("failed to submit pincode input: {e}")))?;
            debug!("submitted pincode with Enter");
        }
    }

    wait_for_hidden(tab, &selectors.modal, MODAL_DISMISS_TIMEOUT).await?;
    // Let any follow-up page update settle before classification.
    tokio::time::sleep(SETTLE_DELAY).await;
    info!(product = %product.name, "pincode modal handled");

    Ok(())
}

/// Bounded poll until `selector` matches nothing or is display-hidden.
async fn wait_for_hidden(tab: &Tab, selector: &str, timeout: Duration) -> Result<(), AppError> {
    let probe = format!(
        "(function() {{ const el = document.querySelector({}); return el === null || el.offsetParent === null; }})()",
        serde_json::json!(selector)
    );
    let deadline = Instant::now() + timeout;

    loop {
        let hidden = tab
            .evaluate(&probe, false)
            .ok()
            .and_then(|object| object.value)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);
        if hidden {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(AppError::Modal(format!(
                "modal '{}' still visible after {}s",
                selector,
                timeout.as_secs()
            )));
        }
        tokio::time::sleep(DISMISS_POLL_INTERVAL).await;
    }
}
