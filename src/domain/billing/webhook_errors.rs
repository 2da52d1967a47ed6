//! Webhook error taxonomy.
//!
//! Every outcome of processing a payment-provider event that is not a
//! successful transition lands here. The variants split into three groups
//! that drive the HTTP response and therefore the provider's retry behavior:
//!
//! - verification failures: 400, no state touched, never retried usefully
//! - deliberate no-ops: acknowledged with 200 so the provider stops redelivering
//! - provider or persistence failures: 500, the provider retries later

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::DomainError;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body and signature header did not verify against the shared secret.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature header could not be parsed.
    #[error("Malformed signature header: {0}")]
    MalformedSignatureHeader(&'static str),

    /// Signed timestamp is too old or too far in the future.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Payload verified but is not an event envelope.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Known event kind whose object lacks a field its transition needs.
    #[error("Incomplete event: {0}")]
    IncompleteEvent(String),

    /// Checkout event carried no user reference in its metadata.
    #[error("Missing user reference in checkout metadata")]
    MissingUserReference,

    /// No subscription record is known for the provider customer.
    #[error("No subscription for customer {customer_id}")]
    NoMatchingSubscription { customer_id: String },

    /// Event kind (or checkout mode) this engine deliberately ignores.
    #[error("Unhandled event kind: {0}")]
    UnhandledEventKind(String),

    /// Payment provider could not supply data needed for the transition.
    #[error("Payment provider failure: {0}")]
    ProviderFailure(String),

    /// A store write or read failed.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl WebhookError {
    /// Returns true for the deliberate no-op cases.
    ///
    /// These are logged and answered with success so the provider does not
    /// redeliver events that will never be actionable.
    pub fn is_acknowledged(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingUserReference
                | WebhookError::IncompleteEvent(_)
                | WebhookError::NoMatchingSubscription { .. }
                | WebhookError::UnhandledEventKind(_)
        )
    }

    /// Returns true if the provider should retry delivering this event.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::ProviderFailure(_) | WebhookError::PersistenceFailure(_)
        )
    }

    /// Returns true if the event never passed verification.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::MalformedSignatureHeader(_)
                | WebhookError::TimestampOutOfRange
        )
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature
            | WebhookError::MalformedSignatureHeader(_)
            | WebhookError::TimestampOutOfRange
            | WebhookError::MalformedEvent(_) => StatusCode::BAD_REQUEST,

            WebhookError::MissingUserReference
            | WebhookError::IncompleteEvent(_)
            | WebhookError::NoMatchingSubscription { .. }
            | WebhookError::UnhandledEventKind(_) => StatusCode::OK,

            WebhookError::ProviderFailure(_) | WebhookError::PersistenceFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::PersistenceFailure(err.to_string())
    }
}
