//! Payment provider port.
//!
//! Checkout events only summarize the purchase, so the sync engine reads the
//! full subscription back from the provider through this port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::billing::SubscriptionObject;

/// Provider-side view of a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSubscription {
    pub id: String,
    pub customer_id: String,
    /// Raw provider status.
    pub status: String,
    /// End of the current billing period (unix seconds).
    pub period_end: Option<i64>,
    /// Price lookup key of the first item, used as the plan name.
    pub lookup_key: Option<String>,
}

impl From<SubscriptionObject> for ProviderSubscription {
    fn from(object: SubscriptionObject) -> Self {
        Self {
            period_end: object.period_end(),
            lookup_key: object.lookup_key().map(str::to_string),
            customer_id: object.customer.id().to_string(),
            id: object.id,
            status: object.status,
        }
    }
}

/// Port for reading subscription state from the payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Retrieves a subscription by provider id.
    ///
    /// Returns `None` if the provider does not know the id.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError>;
}

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    NetworkError,
    AuthenticationError,
    RateLimited,
    ProviderError,
    InvalidResponse,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimited
                | PaymentErrorCode::ProviderError
        )
    }
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}")]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_subscription_from_object_extracts_plan_and_period() {
        let object: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": { "id": "cus_1" },
            "status": "active",
            "items": { "data": [{ "current_period_end": 1735689600, "price": { "lookup_key": "yearly" } }] }
        }))
        .unwrap();

        let subscription = ProviderSubscription::from(object);

        assert_eq!(subscription.customer_id, "cus_1");
        assert_eq!(subscription.lookup_key.as_deref(), Some("yearly"));
        assert_eq!(subscription.period_end, Some(1735689600));
    }

    #[test]
    fn retryability_follows_code() {
        assert!(PaymentError::network("reset").is_retryable());
        assert!(!PaymentError::authentication("bad key").is_retryable());
        assert!(!PaymentError::invalid_response("not json").is_retryable());
    }

    #[test]
    fn error_displays_code_and_message() {
        let err = PaymentError::provider("HTTP 502");
        assert_eq!(err.to_string(), "ProviderError: HTTP 502");
    }

    fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
}
