//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Billing Ports
//!
//! - `SubscriptionStore` - Subscription records and profile tiers
//! - `PaymentProvider` - Subscription lookups at the payment provider
//!
//! ## Meditation Ports
//!
//! - `ScriptGenerator` - LLM script generation
//! - `SpeechSynthesizer` - Text-to-speech
//! - `AudioStorage` - Persisted audio files
//! - `MeditationRepository` - Saved meditations

mod audio_storage;
mod meditation_repository;
mod payment_provider;
mod script_generator;
mod speech_synthesizer;
mod subscription_store;

pub use audio_storage::{AudioStorage, StorageError};
pub use meditation_repository::MeditationRepository;
pub use payment_provider::{PaymentError, PaymentErrorCode, PaymentProvider, ProviderSubscription};
pub use script_generator::{AIError, ScriptGenerator};
pub use speech_synthesizer::{SpeechError, SpeechSynthesizer, VoiceQuota};
pub use subscription_store::SubscriptionStore;
