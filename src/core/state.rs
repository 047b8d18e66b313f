//! Core State trait for state machine states.
//!
//! All state machine states must implement this trait. A state is an
//! immutable snapshot of a workflow; the machine only ever clones, compares
//! and publishes it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: States are handed to every subscriber and to the dispatcher
/// - `PartialEq`: Adjacent equal states are suppressed on the state stream
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable so history can be exported
///
/// # Example
///
/// ```rust
/// use action_machine::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum TransferState {
///     Idle,
///     Sending,
///     Sent,
///     Failed,
/// }
///
/// impl State for TransferState {
///     fn initial() -> Self {
///         Self::Idle
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Sending => "Sending",
///             Self::Sent => "Sent",
///             Self::Failed => "Failed",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Sent | Self::Failed)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Failed)
///     }
/// }
///
/// assert_eq!(TransferState::initial(), TransferState::Idle);
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// The state every machine starts in.
    fn initial() -> Self;

    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// The machine never interprets this; it is a convenience for observers.
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this state carries a failure.
    ///
    /// Dispatchers encode failures into states instead of returning errors,
    /// so observers use this to tell them apart.
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Sending,
        Sent,
        Failed,
    }

    impl State for TestState {
        fn initial() -> Self {
            Self::Idle
        }

        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Sending => "Sending",
                Self::Sent => "Sent",
                Self::Failed => "Failed",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Sent | Self::Failed)
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Failed)
        }
    }

    #[test]
    fn initial_is_distinguished() {
        assert_eq!(TestState::initial(), TestState::Idle);
        assert!(!TestState::initial().is_final());
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Sending.name(), "Sending");
        assert_eq!(TestState::Sent.name(), "Sent");
        assert_eq!(TestState::Failed.name(), "Failed");
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::Idle.is_final());
        assert!(!TestState::Sending.is_final());
        assert!(TestState::Sent.is_final());
        assert!(TestState::Failed.is_final());
    }

    #[test]
    fn is_error_identifies_error_states() {
        assert!(!TestState::Idle.is_error());
        assert!(!TestState::Sent.is_error());
        assert!(TestState::Failed.is_error());
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::Sending;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
