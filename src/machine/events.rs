//! Lifecycle milestones reported through `tracing`.

use std::fmt;

/// Milestones of admission and of a single action's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Action accepted and its lifecycle task spawned
    Admitted,
    /// Admission gate refused the action
    Refused,
    /// A newly admitted action cancelled the one in flight
    Cancelled,
    /// A newly admitted action is waiting for the one in flight to finish
    Waiting,
    /// Lifecycle is about to ask for its will-begin state
    WillBegin,
    /// Lifecycle is entering the dispatch step
    Dispatching,
    /// Lifecycle finished every step
    Ended,
    /// Lifecycle observed cancellation at a checkpoint and stopped
    Stopped,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Refused => "refused",
            Self::Cancelled => "cancelled",
            Self::Waiting => "waiting",
            Self::WillBegin => "will begin dispatching",
            Self::Dispatching => "dispatching",
            Self::Ended => "ended dispatching",
            Self::Stopped => "stopped at checkpoint",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
