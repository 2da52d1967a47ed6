//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `billing` - Subscription lifecycle driven by payment-provider webhooks
//! - `meditation` - Meditation requests, scripts, titles and voices

pub mod billing;
pub mod foundation;
pub mod meditation;
