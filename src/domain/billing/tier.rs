//! Entitlement tier stored on the user profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::status::SubscriptionStatus;
use crate::domain::foundation::ValidationError;

/// Coarse feature gate read by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntitlementTier {
    #[default]
    Free,
    Premium,
}

impl EntitlementTier {
    /// Premium if and only if the subscription is active.
    pub fn for_status(status: SubscriptionStatus) -> Self {
        if status.is_entitled() {
            EntitlementTier::Premium
        } else {
            EntitlementTier::Free
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementTier::Free => "free",
            EntitlementTier::Premium => "premium",
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, EntitlementTier::Premium)
    }
}

impl fmt::Display for EntitlementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntitlementTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(EntitlementTier::Free),
            "premium" => Ok(EntitlementTier::Premium),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_derived_from_status() {
        assert_eq!(
            EntitlementTier::for_status(SubscriptionStatus::Active),
            EntitlementTier::Premium
        );
        assert_eq!(
            EntitlementTier::for_status(SubscriptionStatus::PastDue),
            EntitlementTier::Free
        );
        assert_eq!(
            EntitlementTier::for_status(SubscriptionStatus::Canceled),
            EntitlementTier::Free
        );
    }

    #[test]
    fn default_tier_is_free() {
        assert_eq!(EntitlementTier::default(), EntitlementTier::Free);
    }

    #[test]
    fn parses_stored_form() {
        assert_eq!("premium".parse::<EntitlementTier>().unwrap(), EntitlementTier::Premium);
        assert!("gold".parse::<EntitlementTier>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntitlementTier::Premium).unwrap(),
            "\"premium\""
        );
    }
}
