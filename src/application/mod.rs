//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::billing::{
    GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionView, SyncSubscriptionCommand,
    SyncSubscriptionHandler, SyncSubscriptionResult,
};
pub use handlers::meditation::{
    AudioPipeline, GenerateMeditationCommand, GenerateMeditationHandler, ListMeditationsHandler,
    ListMeditationsQuery, ListVoicesHandler, SynthesizeVoiceCommand, SynthesizeVoiceError,
    SynthesizeVoiceHandler, VoiceCatalogue,
};
