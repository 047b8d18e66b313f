//! Builder API for ergonomic machine and dispatcher construction.
//!
//! This module provides fluent builders and macros for creating machines
//! and dispatchers with minimal boilerplate.

pub mod dispatcher;
pub mod error;
pub mod machine;
pub mod macros;

pub use dispatcher::DispatcherBuilder;
pub use error::BuildError;
pub use machine::StateMachineBuilder;

use crate::core::{Action, Policy, State};
use crate::dispatcher::FnDispatcher;
use std::future::Future;

/// Create a dispatcher that only has a dispatch step: every action is
/// admitted and waits for the one in flight.
///
/// # Example
///
/// ```
/// use action_machine::builder::sequential_dispatcher;
/// use action_machine::core::Action;
/// use action_machine::state_enum;
///
/// state_enum! {
///     enum Feed {
///         Stale,
///         Fresh,
///     }
///     initial: Stale
/// }
///
/// #[derive(Clone, Debug)]
/// struct Refresh;
///
/// impl Action for Refresh {
///     fn name(&self) -> &str { "Refresh" }
/// }
///
/// let dispatcher = sequential_dispatcher(|_: Refresh, _: Feed| async { Feed::Fresh });
/// ```
pub fn sequential_dispatcher<A, S, F, Fut>(dispatch: F) -> FnDispatcher<A, S>
where
    A: Action,
    S: State,
    F: Fn(A, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = S> + Send + 'static,
{
    FnDispatcher::from_dispatch(dispatch)
}

/// Create a dispatcher where every admitted action cancels the one in flight
/// ("latest wins").
///
/// # Example
///
/// ```
/// use action_machine::builder::latest_wins_dispatcher;
/// use action_machine::core::Action;
/// use action_machine::dispatcher::Dispatcher;
/// use action_machine::state_enum;
///
/// state_enum! {
///     enum Search {
///         Empty,
///         Results,
///     }
///     initial: Empty
/// }
///
/// #[derive(Clone, Debug)]
/// struct Query(String);
///
/// impl Action for Query {
///     fn name(&self) -> &str { "Query" }
/// }
///
/// let dispatcher = latest_wins_dispatcher(|_: Query, _: Search| async { Search::Results });
/// let a = Query("a".into());
/// let b = Query("ab".into());
/// assert!(dispatcher.should_cancel_current_action(&a, &b, &Search::Empty));
/// ```
pub fn latest_wins_dispatcher<A, S, F, Fut>(dispatch: F) -> FnDispatcher<A, S>
where
    A: Action,
    S: State,
    F: Fn(A, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = S> + Send + 'static,
{
    let mut dispatcher = FnDispatcher::from_dispatch(dispatch);
    dispatcher.cancel = Policy::always();
    dispatcher
}
