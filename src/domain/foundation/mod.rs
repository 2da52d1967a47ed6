//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps and the error vocabulary used by every other
//! domain module.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MeditationId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
