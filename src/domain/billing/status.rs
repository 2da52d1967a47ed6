//! Subscription status state machine.
//!
//! ```text
//! (none) -> Active -> { PastDue, Canceled }
//! PastDue -> Active | Canceled
//! Canceled -> Active          (resubscription)
//! ```
//!
//! Transitions are computed from each event's own payload, so a late or
//! replayed delivery may land outside this graph. Such transitions are still
//! applied (last write wins); `is_nominal_transition` lets callers report them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// Locally tracked subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    /// Maps a raw provider status onto the local vocabulary.
    ///
    /// `active` and `past_due` map to themselves; anything else (`canceled`,
    /// `unpaid`, `incomplete_expired`, `trialing`, ...) counts as canceled.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "active" => SubscriptionStatus::Active,
            "past_due" => SubscriptionStatus::PastDue,
            _ => SubscriptionStatus::Canceled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }

    /// Returns true if this status pays for premium entitlement.
    pub fn is_entitled(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

/// Returns true if moving from `current` (or from no record) to `target`
/// follows the nominal lifecycle. Replays of the same status count as nominal.
pub fn is_nominal_transition(current: Option<SubscriptionStatus>, target: SubscriptionStatus) -> bool {
    match current {
        None => target == SubscriptionStatus::Active,
        Some(current) => current == target || current.can_transition_to(&target),
    }
}

impl StateMachine for SubscriptionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Active => vec![PastDue, Canceled],
            PastDue => vec![Active, Canceled],
            Canceled => vec![Active],
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    /// Parses the stored representation. Unlike `from_provider` this is strict.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn provider_statuses_map_per_table() {
        assert_eq!(SubscriptionStatus::from_provider("active"), SubscriptionStatus::Active);
        assert_eq!(SubscriptionStatus::from_provider("past_due"), SubscriptionStatus::PastDue);
        assert_eq!(SubscriptionStatus::from_provider("canceled"), SubscriptionStatus::Canceled);
        assert_eq!(SubscriptionStatus::from_provider("unpaid"), SubscriptionStatus::Canceled);
        assert_eq!(SubscriptionStatus::from_provider("trialing"), SubscriptionStatus::Canceled);
        assert_eq!(SubscriptionStatus::from_provider(""), SubscriptionStatus::Canceled);
    }

    #[test]
    fn stored_form_round_trips() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>().unwrap(), status);
        }
    }

    #[test]
    fn stored_form_rejects_unknown() {
        assert!("trialing".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"past_due\"");
    }

    // ══════════════════════════════════════════════════════════════
    // Lifecycle
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn first_record_must_be_active() {
        assert!(is_nominal_transition(None, SubscriptionStatus::Active));
        assert!(!is_nominal_transition(None, SubscriptionStatus::PastDue));
        assert!(!is_nominal_transition(None, SubscriptionStatus::Canceled));
    }

    #[test]
    fn active_can_degrade() {
        let active = SubscriptionStatus::Active;
        assert!(active.can_transition_to(&SubscriptionStatus::PastDue));
        assert!(active.can_transition_to(&SubscriptionStatus::Canceled));
    }

    #[test]
    fn past_due_recovers_or_cancels() {
        let past_due = SubscriptionStatus::PastDue;
        assert!(past_due.can_transition_to(&SubscriptionStatus::Active));
        assert!(past_due.can_transition_to(&SubscriptionStatus::Canceled));
        assert!(!past_due.can_transition_to(&SubscriptionStatus::PastDue));
    }

    #[test]
    fn canceled_only_resubscribes() {
        let canceled = SubscriptionStatus::Canceled;
        assert_eq!(canceled.valid_transitions(), vec![SubscriptionStatus::Active]);
        assert!(!canceled.can_transition_to(&SubscriptionStatus::PastDue));
        assert!(!is_nominal_transition(Some(canceled), SubscriptionStatus::PastDue));
    }

    #[test]
    fn replays_are_nominal() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
        ] {
            assert!(is_nominal_transition(Some(status), status));
        }
    }

    proptest! {
        #[test]
        fn only_active_provider_status_is_entitled(raw in "[a-z_]{0,20}") {
            let status = SubscriptionStatus::from_provider(&raw);
            prop_assert_eq!(status.is_entitled(), raw == "active");
        }
    }
}
