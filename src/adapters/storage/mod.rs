//! Storage adapters.
//!
//! - **LocalAudioStorage** - synthesized audio on the local filesystem
//! - **load_knowledge_base** - markdown guidance for the script prompt

mod knowledge_base;
mod local_audio_storage;

pub use knowledge_base::load_knowledge_base;
pub use local_audio_storage::LocalAudioStorage;
