//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Synthesize and store audio for generated meditations
    #[serde(default)]
    pub generate_audio: bool,
}
