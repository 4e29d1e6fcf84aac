use scraper::{Html, Selector};

use crate::models::StockVerdict;

/// Alert element carrying the explicit sold-out message in static HTML.
pub const STATIC_ALERT_SELECTOR: &str = "div.alert.alert-danger.mt-3";

/// Alert element looked up in the rendered DOM on browser-driven checks.
pub const RENDERED_ALERT_SELECTOR: &str = "div.alert.alert-danger";

const SOLD_OUT_PHRASE: &str = "sold out";

pub const REASON_SOLD_OUT: &str = "explicit 'Sold Out' alert found";
pub const REASON_ASSUMED_IN_STOCK: &str = "no 'Sold Out' alert found, assuming in stock";
pub const REASON_UNCONFIRMED_ALERT: &str = "could not confirm stock status from alert element";

/// Classify statically fetched HTML.
///
/// The monitored site announces unavailability with an explicit danger
/// alert; the absence of that alert is the normal in-stock signal, not an
/// error.
pub fn classify_static(html: &str) -> StockVerdict {
    let selector = match Selector::parse(STATIC_ALERT_SELECTOR) {
        Ok(selector) => selector,
        Err(e) => {
            return StockVerdict::indeterminate(format!("invalid alert selector: {e:?}"));
        }
    };

    let document = Html::parse_document(html);
    if let Some(alert) = document.select(&selector).next() {
        let text = alert.text().collect::<Vec<_>>().join(" ");
        if text.to_lowercase().contains(SOLD_OUT_PHRASE) {
            return StockVerdict::out_of_stock(REASON_SOLD_OUT);
        }
    }

    StockVerdict::in_stock(REASON_ASSUMED_IN_STOCK)
}

/// Classify the alert element text pulled from a rendered page.
///
/// `None` means no alert element exists in the live DOM, the dominant
/// in-stock signal. An alert that is present but does not say "sold out"
/// is classified out-of-stock; this deliberately differs from the static
/// path, which ignores such an alert (see the classifier tests).
pub fn classify_rendered(alert_text: Option<&str>) -> StockVerdict {
    match alert_text {
        None => StockVerdict::in_stock(REASON_ASSUMED_IN_STOCK),
        Some(text) if text.to_lowercase().contains(SOLD_OUT_PHRASE) => {
            StockVerdict::out_of_stock(REASON_SOLD_OUT)
        }
        Some(_) => StockVerdict::out_of_stock(REASON_UNCONFIRMED_ALERT),
    }
}
