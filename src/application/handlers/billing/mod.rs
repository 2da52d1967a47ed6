//! Billing handlers.

mod get_subscription;
mod sync_subscription;

pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionView};
pub use sync_subscription::{
    SyncSubscriptionCommand, SyncSubscriptionHandler, SyncSubscriptionResult,
};
