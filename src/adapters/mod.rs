//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed stores
//! - `memory` - in-process stores for tests and database-less runs
//! - `stripe` - payment provider client
//! - `ai` - chat-completions script generators
//! - `speech` - ElevenLabs text-to-speech
//! - `storage` - local audio files and the prompt knowledge base
//! - `http` - axum routers

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod speech;
pub mod storage;
pub mod stripe;
