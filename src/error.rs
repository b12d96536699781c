//! Error handling module for the order wizard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! None of these errors is fatal to an interactive session: catalog and
//! transport failures are converted into fallbacks at the call site.

use thiserror::Error;

/// Main error type for the order wizard
#[derive(Error, Debug)]
pub enum OrderWizardError {
    /// IO errors (catalog and order files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog collection could not be fetched or parsed
    #[error("Catalog unavailable ({collection}): {reason}")]
    CatalogUnavailable {
        collection: &'static str,
        reason: String,
    },

    /// The submission bridge is missing or refused the payload
    #[error("Submission transport unavailable: {0}")]
    Transport(String),

    /// An order payload was requested before every selection was made
    #[error("Order is incomplete: missing {0}")]
    IncompleteOrder(&'static str),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for order wizard operations
pub type Result<T> = std::result::Result<T, OrderWizardError>;

impl OrderWizardError {
    /// Create a catalog error for the named collection
    pub fn catalog(collection: &'static str, reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            collection,
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OrderWizardError::transport("bridge answered 503");
        assert_eq!(
            err.to_string(),
            "Submission transport unavailable: bridge answered 503"
        );

        let err = OrderWizardError::catalog("tariffs", "connection refused");
        assert_eq!(
            err.to_string(),
            "Catalog unavailable (tariffs): connection refused"
        );

        let err = OrderWizardError::IncompleteOrder("speed tier");
        assert_eq!(err.to_string(), "Order is incomplete: missing speed tier");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OrderWizardError = io_err.into();
        assert!(matches!(err, OrderWizardError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: OrderWizardError = json_err.into();
        assert!(matches!(err, OrderWizardError::Json(_)));
    }
}
