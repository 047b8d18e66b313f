//! Dispatcher abstraction.
//!
//! A dispatcher is the policy object a machine consults for every action:
//! - whether a new action is admitted while another is in flight
//! - whether the new action preempts the current one or waits behind it
//! - which states to publish before, during and after the unit of work
//!
//! Dispatchers never return errors. Failures are encoded into the returned
//! state, and retries, if any, live inside `dispatch`.

mod function;

use crate::core::{Action, State};
use async_trait::async_trait;
use std::sync::Arc;

pub use function::{DispatchHandler, FnDispatcher, StageHandler};

/// Policy and work supplier for an [`ActionStateMachine`](crate::machine::ActionStateMachine).
///
/// The two decision methods are only consulted while an action is in flight.
/// They run without any machine lock held and may read the machine back,
/// but must not block.
/// The three async methods form the lifecycle of every admitted action and
/// are called strictly one lifecycle at a time per machine.
#[async_trait]
pub trait Dispatcher: Send + Sync + 'static {
    type State: State;
    type Action: Action;

    /// Asks whether `new` should be admitted while `current` is in flight.
    ///
    /// Returning `false` drops `new` silently. Default admits everything.
    fn should_begin_dispatching(
        &self,
        _current: &Self::Action,
        _new: &Self::Action,
        _state: &Self::State,
    ) -> bool {
        true
    }

    /// Asks whether an admitted `new` action cancels `current` (`true`) or
    /// waits for it to finish (`false`). Default waits.
    fn should_cancel_current_action(
        &self,
        _current: &Self::Action,
        _new: &Self::Action,
        _state: &Self::State,
    ) -> bool {
        false
    }

    /// Called at the start of every lifecycle. A returned state, typically a
    /// loading state, is published before `dispatch` runs.
    async fn action_will_begin_dispatching(
        &self,
        _action: &Self::Action,
        _state: &Self::State,
    ) -> Option<Self::State> {
        None
    }

    /// Performs the unit of work for `action`. The result is always published.
    async fn dispatch(&self, action: &Self::Action, state: &Self::State) -> Self::State;

    /// Called after a dispatch that was not cancelled. A returned state is
    /// published before the action is cleared from the machine.
    async fn action_did_end_dispatching(
        &self,
        _action: &Self::Action,
        _state: &Self::State,
    ) -> Option<Self::State> {
        None
    }
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    type State = D::State;
    type Action = D::Action;

    fn should_begin_dispatching(
        &self,
        current: &Self::Action,
        new: &Self::Action,
        state: &Self::State,
    ) -> bool {
        (**self).should_begin_dispatching(current, new, state)
    }

    fn should_cancel_current_action(
        &self,
        current: &Self::Action,
        new: &Self::Action,
        state: &Self::State,
    ) -> bool {
        (**self).should_cancel_current_action(current, new, state)
    }

    async fn action_will_begin_dispatching(
        &self,
        action: &Self::Action,
        state: &Self::State,
    ) -> Option<Self::State> {
        (**self).action_will_begin_dispatching(action, state).await
    }

    async fn dispatch(&self, action: &Self::Action, state: &Self::State) -> Self::State {
        (**self).dispatch(action, state).await
    }

    async fn action_did_end_dispatching(
        &self,
        action: &Self::Action,
        state: &Self::State,
    ) -> Option<Self::State> {
        (**self).action_did_end_dispatching(action, state).await
    }
}
