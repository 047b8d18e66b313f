//! Policy predicates for admission and cancellation decisions.
//!
//! A policy looks at the action currently in flight, the newly submitted
//! action and the latest published state, and answers yes or no. Policies
//! are pure: they must not block and must not have side effects.

use super::action::Action;
use super::state::State;
use std::sync::Arc;

type Predicate<A, S> = dyn Fn(&A, &A, &S) -> bool + Send + Sync;

/// Pure predicate over `(current action, new action, current state)`.
///
/// # Example
///
/// ```rust
/// use action_machine::core::{Action, Policy, State};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phase { Idle, Busy }
///
/// impl State for Phase {
///     fn initial() -> Self { Self::Idle }
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Busy => "Busy",
///         }
///     }
/// }
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Submit(u32);
///
/// impl Action for Submit {
///     fn name(&self) -> &str { "Submit" }
/// }
///
/// // Refuse a second submission of the same payload.
/// let admit = Policy::new(|current: &Submit, new: &Submit, _: &Phase| current != new);
///
/// assert!(admit.check(&Submit(1), &Submit(2), &Phase::Busy));
/// assert!(!admit.check(&Submit(1), &Submit(1), &Phase::Busy));
/// ```
pub struct Policy<A: Action, S: State> {
    predicate: Arc<Predicate<A, S>>,
}

impl<A: Action, S: State> Policy<A, S> {
    /// Create a policy from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&A, &A, &S) -> bool + Send + Sync + 'static,
    {
        Policy {
            predicate: Arc::new(predicate),
        }
    }

    /// Policy that always answers `true`.
    pub fn always() -> Self {
        Self::new(|_, _, _| true)
    }

    /// Policy that always answers `false`.
    pub fn never() -> Self {
        Self::new(|_, _, _| false)
    }

    /// Evaluate the policy.
    pub fn check(&self, current: &A, new: &A, state: &S) -> bool {
        (self.predicate)(current, new, state)
    }
}

impl<A: Action, S: State> Clone for Policy<A, S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}
