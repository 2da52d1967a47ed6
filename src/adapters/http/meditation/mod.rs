//! HTTP adapter for meditation generation and voice synthesis.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    GenerateRequest, GenerateResponse, MeditationHistoryItem, MeditationListResponse,
    MeditationResponse, VoiceRequest,
};
pub use handlers::MeditationAppState;
pub use routes::meditation_router;
