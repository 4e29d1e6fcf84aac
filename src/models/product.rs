use serde::{Deserialize, Serialize};

/// A monitored product. Loaded once at startup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub url: String,

    /// Pincode to enter when the page blocks content behind a location
    /// modal. Unset means no modal handling is needed for this product.
    #[serde(default)]
    pub pincode: Option<String>,

    /// Check with the shared headless browser instead of a plain HTTP GET.
    /// Needed for pages that only render stock state via JavaScript.
    #[serde(default)]
    pub use_browser: bool,

    #[serde(default)]
    pub pincode_selectors: PincodeSelectors,
}

/// Selectors for the pieces of the location modal. The defaults match the
/// monitored storefront; individual products can override any of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PincodeSelectors {
    pub modal: String,
    pub input: String,
    pub submit_button: String,
}

impl Default for PincodeSelectors {
    fn default() -> Self {
        Self {
            modal: "#locationWidgetModal".to_string(),
            input: "#search".to_string(),
            submit_button: ".btn-success".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_product_deserializes_with_defaults() {
        let product: Product = serde_json::from_str(
            r#"{"name": "Widget", "url": "https://shop.example.com/widget"}"#,
        )
        .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.pincode, None);
        assert!(!product.use_browser);
        assert_eq!(product.pincode_selectors.modal, "#locationWidgetModal");
        assert_eq!(product.pincode_selectors.input, "#search");
        assert_eq!(product.pincode_selectors.submit_button, ".btn-success");
    }

    #[test]
    fn test_selector_overrides_are_partial() {
        let product: Product = serde_json::from_str(
            r##"{
                "name": "Widget",
                "url": "https://shop.example.com/widget",
                "pincode": "560001",
                "use_browser": true,
                "pincode_selectors": {"input": "#pincode-entry"}
            }"##,
        )
        .unwrap();

        assert_eq!(product.pincode.as_deref(), Some("560001"));
        assert!(product.use_browser);
        assert_eq!(product.pincode_selectors.input, "#pincode-entry");
        // Unlisted selectors keep their defaults
        assert_eq!(product.pincode_selectors.modal, "#locationWidgetModal");
    }
}
