//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_subscription, handle_stripe_webhook, BillingAppState};

/// Billing routes, mounted under `/api`.
///
/// # Routes
/// - `POST /webhooks/stripe` - Stripe webhooks (signature verified, no auth)
/// - `GET /subscription/:user_id` - Subscription record and tier
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .route("/webhooks/stripe", post(handle_stripe_webhook))
        .route("/subscription/:user_id", get(get_subscription))
}
