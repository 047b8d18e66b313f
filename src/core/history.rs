//! Published state history.
//!
//! Every state the machine publishes is recorded together with the lifecycle
//! stage and the dispatch that produced it. History is immutable: `record`
//! returns a new history and leaves the original untouched.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Lifecycle step that produced a published state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Returned by `action_will_begin_dispatching`
    WillBegin,
    /// Returned by `dispatch`
    Dispatch,
    /// Returned by `action_did_end_dispatching`
    DidEnd,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WillBegin => f.write_str("will-begin"),
            Self::Dispatch => f.write_str("dispatch"),
            Self::DidEnd => f.write_str("did-end"),
        }
    }
}

/// Record of a single published state change.
///
/// # Example
///
/// ```rust
/// use action_machine::core::{Stage, State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Upload {
///     Idle,
///     Uploading,
/// }
///
/// impl State for Upload {
///     fn initial() -> Self { Self::Idle }
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Uploading => "Uploading",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Upload::Idle,
///     to: Upload::Uploading,
///     timestamp: Utc::now(),
///     stage: Stage::WillBegin,
///     action: "Upload".to_string(),
///     dispatch_id: Uuid::new_v4(),
/// };
/// assert_eq!(transition.stage, Stage::WillBegin);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state that was current before the publish
    pub from: S,
    /// The newly published state
    pub to: S,
    /// When the state was published
    pub timestamp: DateTime<Utc>,
    /// Lifecycle step that produced `to`
    pub stage: Stage,
    /// Name of the action being processed
    pub action: String,
    /// Identifier of the lifecycle run that published the state
    pub dispatch_id: Uuid,
}

/// Ordered history of published states, optionally bounded.
///
/// When a limit is set, recording past it drops the oldest transitions.
///
/// # Example
///
/// ```rust
/// use action_machine::core::{Stage, State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Step { A, B, C }
///
/// impl State for Step {
///     fn initial() -> Self { Self::A }
///     fn name(&self) -> &str {
///         match self {
///             Self::A => "A",
///             Self::B => "B",
///             Self::C => "C",
///         }
///     }
/// }
///
/// let id = Uuid::new_v4();
/// let record = |from, to, stage| StateTransition {
///     from,
///     to,
///     timestamp: Utc::now(),
///     stage,
///     action: "Go".to_string(),
///     dispatch_id: id,
/// };
///
/// let history = StateHistory::new()
///     .record(record(Step::A, Step::B, Stage::WillBegin))
///     .record(record(Step::B, Step::C, Stage::Dispatch));
///
/// assert_eq!(history.get_path(), vec![&Step::A, &Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` transitions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Maximum number of transitions kept, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record a transition, returning a new history.
    ///
    /// This does not mutate the existing history. If the history is bounded
    /// the oldest transitions are dropped to stay within the limit.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        if let Some(limit) = self.limit {
            let excess = transitions.len().saturating_sub(limit);
            transitions.drain(..excess);
        }
        Self {
            transitions,
            limit: self.limit,
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest kept transition followed by
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Transitions published by one lifecycle run, in order.
    pub fn for_dispatch(&self, dispatch_id: Uuid) -> Vec<&StateTransition<S>> {
        self.transitions
            .iter()
            .filter(|t| t.dispatch_id == dispatch_id)
            .collect()
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    /// Get all transitions, oldest first.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
