//! Mindful - personalized meditation backend
//!
//! Generates meditation scripts and audio, and keeps subscription state in
//! sync with the payment provider through signed webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
