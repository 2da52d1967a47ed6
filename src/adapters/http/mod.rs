//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod billing;
pub mod error;
pub mod meditation;
mod router;

pub use billing::{billing_router, BillingAppState};
pub use error::{ApiError, ErrorResponse};
pub use meditation::{meditation_router, MeditationAppState};
pub use router::{app_router, RouterOptions};
