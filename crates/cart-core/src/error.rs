//! # Checkout Error Types
//!
//! Typed error handling for the checkout service.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Malformed client request (bad items, price reference, amount or session id)
    #[error("{0}")]
    Validation(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment provider API error
    #[error("{message}")]
    Provider { provider: String, message: String },

    /// Transport failure talking to the provider
    #[error("{0}")]
    Network(String),

    /// Provider response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CheckoutError::Validation(message.into())
    }

    /// Returns true if the client caused this error
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckoutError::Validation(_))
    }

    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Only validation failures are the caller's fault; everything that goes
    /// wrong while talking to the provider is reported as 500.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Validation(_) => 400,
            CheckoutError::Configuration(_)
            | CheckoutError::Provider { .. }
            | CheckoutError::Network(_)
            | CheckoutError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::validation("Invalid priceId").status_code(), 400);
        assert_eq!(
            CheckoutError::Provider {
                provider: "stripe".into(),
                message: "No such price".into()
            }
            .status_code(),
            500
        );
        assert_eq!(CheckoutError::Network("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_messages_surface_unchanged() {
        let err = CheckoutError::validation("Missing items[]");
        assert_eq!(err.to_string(), "Missing items[]");
        assert!(err.is_validation());

        let err = CheckoutError::Provider {
            provider: "stripe".into(),
            message: "No such price: 'price_abc'".into(),
        };
        assert_eq!(err.to_string(), "No such price: 'price_abc'");
        assert!(!err.is_validation());

        let err = CheckoutError::Network("operation timed out".into());
        assert_eq!(err.to_string(), "operation timed out");
    }
}
