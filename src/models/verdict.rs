use serde::{Deserialize, Serialize};

/// Outcome of a single stock check, with a human-readable reason.
///
/// `Indeterminate` means the check itself failed (fetch, parse or modal
/// interaction). It never updates tracked state and never notifies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StockVerdict {
    InStock { reason: String },
    OutOfStock { reason: String },
    Indeterminate { reason: String },
}

/// The two statuses worth remembering between checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackedStatus {
    InStock,
    OutOfStock,
}

impl StockVerdict {
    pub fn in_stock(reason: impl Into<String>) -> Self {
        Self::InStock { reason: reason.into() }
    }

    pub fn out_of_stock(reason: impl Into<String>) -> Self {
        Self::OutOfStock { reason: reason.into() }
    }

    pub fn indeterminate(reason: impl Into<String>) -> Self {
        Self::Indeterminate { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::InStock { reason } | Self::OutOfStock { reason } | Self::Indeterminate { reason } => {
                reason
            }
        }
    }

    pub fn is_in_stock(&self) -> bool {
        matches!(self, Self::InStock { .. })
    }

    /// Projection onto trackable state. `None` for `Indeterminate`, so a
    /// failed check can never overwrite the last known status.
    pub fn tracked(&self) -> Option<TrackedStatus> {
        match self {
            Self::InStock { .. } => Some(TrackedStatus::InStock),
            Self::OutOfStock { .. } => Some(TrackedStatus::OutOfStock),
            Self::Indeterminate { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_projection() {
        assert_eq!(
            StockVerdict::in_stock("available").tracked(),
            Some(TrackedStatus::InStock)
        );
        assert_eq!(
            StockVerdict::out_of_stock("sold out").tracked(),
            Some(TrackedStatus::OutOfStock)
        );
        assert_eq!(StockVerdict::indeterminate("timeout").tracked(), None);
    }

    #[test]
    fn test_reason_is_preserved() {
        let verdict = StockVerdict::indeterminate("request failed: connection refused");
        assert_eq!(verdict.reason(), "request failed: connection refused");
        assert!(!verdict.is_in_stock());
    }
}
