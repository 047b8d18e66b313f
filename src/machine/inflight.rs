//! Bookkeeping for the single in-flight action.

use crate::dispatcher::Dispatcher;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The action currently owning the machine, and the tokens of its task.
///
/// `cancel` is the cooperative cancellation signal observed at the two
/// lifecycle checkpoints. `done` fires when the task exits for any reason,
/// including a panic inside the dispatcher.
pub(crate) struct InFlight<A> {
    pub action: A,
    pub id: Uuid,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl<A: Clone> InFlight<A> {
    pub fn new(action: A) -> Self {
        Self {
            action,
            id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.done.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn completion(&self) -> CancellationToken {
        self.done.clone()
    }

    /// Copy of the record that the dispatcher can be consulted with after the
    /// in-flight lock is released.
    pub fn snapshot(&self) -> Snapshot<A> {
        Snapshot {
            action: self.action.clone(),
            id: self.id,
            done: self.done.clone(),
        }
    }
}

/// Detached view of a live in-flight record.
pub(crate) struct Snapshot<A> {
    pub action: A,
    pub id: Uuid,
    done: CancellationToken,
}

/// Snapshot of the live record in `slot`, if any. A finished record counts
/// as nothing in flight.
pub(crate) fn live<A: Clone>(slot: Option<&InFlight<A>>) -> Option<Snapshot<A>> {
    slot.filter(|record| !record.is_finished())
        .map(InFlight::snapshot)
}

/// What `accept` does with a new action.
#[derive(Debug)]
pub(crate) enum Admission {
    /// Nothing in flight; start right away without consulting the dispatcher
    Start,
    /// Admission gate said no
    Refuse,
    /// Cancel the in-flight action (`victim`) and start the new one after it
    Preempt { victim: Uuid },
    /// Wait until the in-flight action's task exits, then decide again
    Wait { victim: Uuid, completion: CancellationToken },
}

/// Decide how to admit `new` against a snapshot of the in-flight record.
///
/// Pure apart from the dispatcher's own policy code: nothing is cancelled
/// here, the caller applies the decision once it has re-validated that the
/// snapshot is still current.
pub(crate) fn admission<D: Dispatcher>(
    dispatcher: &D,
    current: Option<&Snapshot<D::Action>>,
    new: &D::Action,
    state: &D::State,
) -> Admission {
    let Some(current) = current else {
        return Admission::Start;
    };

    if !dispatcher.should_begin_dispatching(&current.action, new, state) {
        return Admission::Refuse;
    }

    if dispatcher.should_cancel_current_action(&current.action, new, state) {
        Admission::Preempt { victim: current.id }
    } else {
        Admission::Wait {
            victim: current.id,
            completion: current.done.clone(),
        }
    }
}
