//! HTTP handlers for billing endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::ApiError;
use crate::application::handlers::billing::{
    GetSubscriptionHandler, GetSubscriptionQuery, SyncSubscriptionCommand, SyncSubscriptionHandler,
};
use crate::domain::billing::WebhookError;
use crate::domain::foundation::UserId;

use super::dto::{SubscriptionResponse, WebhookReceivedResponse};

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

const DATABASE_NOT_CONFIGURED: &str = "Database not configured";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Billing dependencies. Both are absent when no database is configured.
#[derive(Clone, Default)]
pub struct BillingAppState {
    pub sync_handler: Option<Arc<SyncSubscriptionHandler>>,
    pub subscription_handler: Option<Arc<GetSubscriptionHandler>>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhooks/stripe - Apply a subscription event.
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let Some(handler) = state.sync_handler.as_ref() else {
        tracing::error!("Webhook received but no subscription store is configured");
        return Err(ApiError::internal(DATABASE_NOT_CONFIGURED));
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = SyncSubscriptionCommand {
        payload: body.to_vec(),
        signature,
    };

    match handler.handle(cmd).await {
        Ok(_) => Ok(Json(WebhookReceivedResponse::received())),
        Err(err) if err.is_acknowledged() => Ok(Json(WebhookReceivedResponse::received())),
        Err(err) => Err(webhook_error(err)),
    }
}

/// GET /api/subscription/:user_id - Current subscription and tier.
pub async fn get_subscription(
    State(state): State<BillingAppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state
        .subscription_handler
        .as_ref()
        .ok_or_else(|| ApiError::unavailable(DATABASE_NOT_CONFIGURED))?;
    let user_id = UserId::new(user_id).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let view = handler
        .handle(GetSubscriptionQuery { user_id })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Subscription lookup failed");
            ApiError::internal("Internal server error")
        })?
        .ok_or_else(|| ApiError::not_found("Subscription not found"))?;

    Ok(Json(SubscriptionResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

fn webhook_error(err: WebhookError) -> ApiError {
    let message = if err.is_verification_failure() {
        "Invalid signature"
    } else if err.is_retryable() {
        "Webhook handler failed"
    } else {
        "Invalid payload"
    };
    ApiError::new(err.status_code(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn verification_failures_map_to_invalid_signature() {
        for err in [
            WebhookError::InvalidSignature,
            WebhookError::MalformedSignatureHeader("missing timestamp"),
            WebhookError::TimestampOutOfRange,
        ] {
            let api = webhook_error(err);
            assert_eq!(api.status, StatusCode::BAD_REQUEST);
            assert_eq!(api.message, "Invalid signature");
        }
    }

    #[test]
    fn malformed_event_maps_to_invalid_payload() {
        let api = webhook_error(WebhookError::MalformedEvent("not json".to_string()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Invalid payload");
    }

    #[test]
    fn failures_map_to_retryable_500() {
        for err in [
            WebhookError::ProviderFailure("timeout".to_string()),
            WebhookError::PersistenceFailure("down".to_string()),
        ] {
            let api = webhook_error(err);
            assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api.message, "Webhook handler failed");
        }
    }
}
