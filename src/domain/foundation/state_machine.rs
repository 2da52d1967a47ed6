//! State machine trait for status enums.

/// Trait for status enums that represent state machines.
///
/// Implementors list the nominal transitions; callers decide whether an
/// off-graph transition is rejected or merely reported.
pub trait StateMachine: Sized + Copy + PartialEq {
    /// Returns all nominal target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if `target` is one of the nominal targets.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }
}
