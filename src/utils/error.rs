use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Classification failed: {0}")]
    Classify(String),

    #[error("Pincode modal handling failed: {0}")]
    Modal(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    #[error("Browser setup failed: {0}")]
    Setup(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_modal_error_display() {
        let err = AppError::Modal("submit button vanished".to_string());
        assert_eq!(
            err.to_string(),
            "Pincode modal handling failed: submit button vanished"
        );
    }

    #[test]
    fn test_setup_error_display() {
        let err = AppError::Setup("chrome binary not found".to_string());
        assert_eq!(err.to_string(), "Browser setup failed: chrome binary not found");
    }
}
