//! In-memory adapters for tests and local development without a database.

mod meditation_repository;
mod subscription_store;

pub use meditation_repository::InMemoryMeditationRepository;
pub use subscription_store::{InMemorySubscriptionStore, Observation};
