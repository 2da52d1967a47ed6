//! PostgreSQL adapters - database implementations of the persistence ports.
//!
//! - `PostgresSubscriptionStore` - subscriptions plus profile tiers, one transaction per transition
//! - `PostgresMeditationRepository` - generated meditation history

mod meditation_repository;
mod subscription_store;

pub use meditation_repository::PostgresMeditationRepository;
pub use subscription_store::PostgresSubscriptionStore;
