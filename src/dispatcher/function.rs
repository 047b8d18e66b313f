//! Dispatcher assembled from closures.

use crate::core::{Action, Policy, State};
use crate::dispatcher::Dispatcher;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// Handler for the dispatch step. Receives owned clones of the action and
/// the latest published state.
pub type DispatchHandler<A, S> = Arc<dyn Fn(A, S) -> BoxFuture<'static, S> + Send + Sync>;

/// Handler for the will-begin and did-end steps.
pub type StageHandler<A, S> = Arc<dyn Fn(A, S) -> BoxFuture<'static, Option<S>> + Send + Sync>;

/// A [`Dispatcher`] whose decisions are [`Policy`] predicates and whose
/// lifecycle steps are async closures.
///
/// Build one with [`DispatcherBuilder`](crate::builder::DispatcherBuilder).
pub struct FnDispatcher<A: Action, S: State> {
    pub(crate) admit: Policy<A, S>,
    pub(crate) cancel: Policy<A, S>,
    pub(crate) will_begin: Option<StageHandler<A, S>>,
    pub(crate) dispatch: DispatchHandler<A, S>,
    pub(crate) did_end: Option<StageHandler<A, S>>,
}

impl<A: Action, S: State> FnDispatcher<A, S> {
    /// Dispatcher with only a dispatch step, admitting everything and
    /// queueing behind the action in flight.
    pub fn from_dispatch<F, Fut>(dispatch: F) -> Self
    where
        F: Fn(A, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = S> + Send + 'static,
    {
        Self {
            admit: Policy::always(),
            cancel: Policy::never(),
            will_begin: None,
            dispatch: Arc::new(move |action, state| dispatch(action, state).boxed()),
            did_end: None,
        }
    }
}

impl<A: Action, S: State> Clone for FnDispatcher<A, S> {
    fn clone(&self) -> Self {
        Self {
            admit: self.admit.clone(),
            cancel: self.cancel.clone(),
            will_begin: self.will_begin.clone(),
            dispatch: Arc::clone(&self.dispatch),
            did_end: self.did_end.clone(),
        }
    }
}

#[async_trait]
impl<A: Action, S: State> Dispatcher for FnDispatcher<A, S> {
    type State = S;
    type Action = A;

    fn should_begin_dispatching(&self, current: &A, new: &A, state: &S) -> bool {
        self.admit.check(current, new, state)
    }

    fn should_cancel_current_action(&self, current: &A, new: &A, state: &S) -> bool {
        self.cancel.check(current, new, state)
    }

    async fn action_will_begin_dispatching(&self, action: &A, state: &S) -> Option<S> {
        match &self.will_begin {
            Some(handler) => handler(action.clone(), state.clone()).await,
            None => None,
        }
    }

    async fn dispatch(&self, action: &A, state: &S) -> S {
        (self.dispatch)(action.clone(), state.clone()).await
    }

    async fn action_did_end_dispatching(&self, action: &A, state: &S) -> Option<S> {
        match &self.did_end {
            Some(handler) => handler(action.clone(), state.clone()).await,
            None => None,
        }
    }
}
