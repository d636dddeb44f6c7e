//! Per-connection session lifecycle states.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of one visitor connection.
///
/// `Connecting → Registered → Active → Closed`. Every non-terminal state may
/// also jump straight to `Closed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Upgrade requested, no duplex connection yet.
    #[default]
    Connecting,
    /// Duplex connection established; joining the registry and greeting.
    Registered,
    /// Greeting and count delivered; idling on inbound reads.
    Active,
    /// Removed from the registry and connection released.
    Closed,
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Connecting, Registered)
                | (Connecting, Closed)
                | (Registered, Active)
                | (Registered, Closed)
                | (Active, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Connecting => vec![Registered, Closed],
            Registered => vec![Active, Closed],
            Active => vec![Closed],
            Closed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_valid() {
        let state = SessionState::default();
        let state = state.transition_to(SessionState::Registered).unwrap();
        let state = state.transition_to(SessionState::Active).unwrap();
        let state = state.transition_to(SessionState::Closed).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn every_live_state_can_close() {
        for state in [
            SessionState::Connecting,
            SessionState::Registered,
            SessionState::Active,
        ] {
            assert!(state.can_transition_to(&SessionState::Closed), "{:?}", state);
        }
    }

    #[test]
    fn cannot_skip_registration() {
        assert!(SessionState::Connecting
            .transition_to(SessionState::Active)
            .is_err());
    }

    #[test]
    fn closed_cannot_reopen() {
        assert!(SessionState::Closed
            .transition_to(SessionState::Active)
            .is_err());
    }
}
