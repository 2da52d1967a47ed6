//! Mock payment provider for testing.
//!
//! Supports pre-configured subscriptions, error injection and call tracking.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{PaymentError, PaymentProvider, ProviderSubscription};

#[derive(Default)]
struct MockState {
    subscriptions: HashMap<String, ProviderSubscription>,
    error: Option<PaymentError>,
    calls: Vec<String>,
}

/// Mock payment provider.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.set_subscription(subscription);
/// mock.set_error(PaymentError::network("timeout"));
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subscription(&self, subscription: ProviderSubscription) {
        if let Ok(mut state) = self.inner.lock() {
            state.subscriptions.insert(subscription.id.clone(), subscription);
        }
    }

    /// Every following call fails with `error`.
    pub fn set_error(&self, error: PaymentError) {
        if let Ok(mut state) = self.inner.lock() {
            state.error = Some(error);
        }
    }

    pub fn clear_error(&self) {
        if let Ok(mut state) = self.inner.lock() {
            state.error = None;
        }
    }

    /// Subscription ids requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<ProviderSubscription>, PaymentError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| PaymentError::provider("mock state poisoned"))?;
        state.calls.push(subscription_id.to_string());
        if let Some(error) = &state.error {
            return Err(error.clone());
        }
        Ok(state.subscriptions.get(subscription_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription() -> ProviderSubscription {
        ProviderSubscription {
            id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status: "active".to_string(),
            period_end: None,
            lookup_key: None,
        }
    }

    #[tokio::test]
    async fn returns_configured_subscription_and_tracks_calls() {
        let mock = MockPaymentProvider::new();
        mock.set_subscription(subscription());

        let found = mock.get_subscription("sub_1").await.unwrap();
        let missing = mock.get_subscription("sub_2").await.unwrap();

        assert_eq!(found, Some(subscription()));
        assert!(missing.is_none());
        assert_eq!(mock.calls(), vec!["sub_1", "sub_2"]);
    }

    #[tokio::test]
    async fn injected_error_is_returned_until_cleared() {
        let mock = MockPaymentProvider::new();
        mock.set_subscription(subscription());
        mock.set_error(PaymentError::network("timeout"));

        assert!(mock.get_subscription("sub_1").await.is_err());

        mock.clear_error();
        assert!(mock.get_subscription("sub_1").await.unwrap().is_some());
    }
}
