//! Builder for closure-backed dispatchers.

use crate::builder::error::BuildError;
use crate::core::{Action, Policy, State};
use crate::dispatcher::{DispatchHandler, FnDispatcher, StageHandler};
use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// Builder for [`FnDispatcher`] with a fluent API.
///
/// Without explicit rules every action is admitted and waits for the one in
/// flight. Only the dispatch handler is required.
pub struct DispatcherBuilder<A: Action, S: State> {
    admit: Policy<A, S>,
    cancel: Policy<A, S>,
    will_begin: Option<StageHandler<A, S>>,
    dispatch: Option<DispatchHandler<A, S>>,
    did_end: Option<StageHandler<A, S>>,
}

impl<A: Action, S: State> DispatcherBuilder<A, S> {
    /// Create a new dispatcher builder.
    pub fn new() -> Self {
        Self {
            admit: Policy::always(),
            cancel: Policy::never(),
            will_begin: None,
            dispatch: None,
            did_end: None,
        }
    }

    /// Set the admission gate consulted while an action is in flight.
    pub fn admit(mut self, policy: Policy<A, S>) -> Self {
        self.admit = policy;
        self
    }

    /// Set the admission gate using a closure.
    pub fn admit_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&A, &A, &S) -> bool + Send + Sync + 'static,
    {
        self.admit(Policy::new(predicate))
    }

    /// Set the rule deciding whether an admitted action preempts the current one.
    pub fn cancel(mut self, policy: Policy<A, S>) -> Self {
        self.cancel = policy;
        self
    }

    /// Set the preemption rule using a closure.
    pub fn cancel_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&A, &A, &S) -> bool + Send + Sync + 'static,
    {
        self.cancel(Policy::new(predicate))
    }

    /// Set the will-begin handler (optional).
    pub fn will_begin<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(A, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<S>> + Send + 'static,
    {
        self.will_begin = Some(Arc::new(move |action, state| handler(action, state).boxed()));
        self
    }

    /// Set the dispatch handler (required).
    pub fn dispatch<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(A, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = S> + Send + 'static,
    {
        self.dispatch = Some(Arc::new(move |action, state| handler(action, state).boxed()));
        self
    }

    /// Set the did-end handler (optional).
    pub fn did_end<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(A, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<S>> + Send + 'static,
    {
        self.did_end = Some(Arc::new(move |action, state| handler(action, state).boxed()));
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Result<FnDispatcher<A, S>, BuildError> {
        let dispatch = self.dispatch.ok_or(BuildError::MissingDispatch)?;

        Ok(FnDispatcher {
            admit: self.admit,
            cancel: self.cancel,
            will_begin: self.will_begin,
            dispatch,
            did_end: self.did_end,
        })
    }
}

impl<A: Action, S: State> Default for DispatcherBuilder<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Signup {
        Blank,
        Sending(String),
        Sent(String),
        Rejected(String),
    }

    impl State for Signup {
        fn initial() -> Self {
            Self::Blank
        }

        fn name(&self) -> &str {
            match self {
                Self::Blank => "Blank",
                Self::Sending(_) => "Sending",
                Self::Sent(_) => "Sent",
                Self::Rejected(_) => "Rejected",
            }
        }

        fn is_error(&self) -> bool {
            matches!(self, Self::Rejected(_))
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Submit(String);

    impl Action for Submit {
        fn name(&self) -> &str {
            "Submit"
        }
    }

    #[test]
    fn build_requires_dispatch_handler() {
        let result = DispatcherBuilder::<Submit, Signup>::new().build();

        assert!(matches!(result, Err(BuildError::MissingDispatch)));
    }

    #[tokio::test]
    async fn defaults_admit_and_wait() {
        let dispatcher = DispatcherBuilder::new()
            .dispatch(|Submit(name): Submit, _: Signup| async move { Signup::Sent(name) })
            .build()
            .unwrap();

        let a = Submit("a".into());
        let b = Submit("b".into());
        assert!(dispatcher.should_begin_dispatching(&a, &b, &Signup::Blank));
        assert!(!dispatcher.should_cancel_current_action(&a, &b, &Signup::Blank));
        assert_eq!(dispatcher.action_will_begin_dispatching(&a, &Signup::Blank).await, None);
        assert_eq!(dispatcher.action_did_end_dispatching(&a, &Signup::Blank).await, None);
    }

    #[tokio::test]
    async fn handlers_receive_action_and_state() {
        let dispatcher = DispatcherBuilder::new()
            .admit_when(|current: &Submit, new: &Submit, _: &Signup| current != new)
            .cancel_when(|_: &Submit, _: &Submit, state: &Signup| state.is_error())
            .will_begin(|Submit(name): Submit, _: Signup| async move { Some(Signup::Sending(name)) })
            .dispatch(|Submit(name): Submit, state: Signup| async move {
                match state {
                    Signup::Sending(_) if name.is_empty() => Signup::Rejected("empty name".into()),
                    _ => Signup::Sent(name),
                }
            })
            .did_end(|_: Submit, state: Signup| async move {
                state.is_error().then_some(Signup::Blank)
            })
            .build()
            .unwrap();

        let named = Submit("Ada".into());
        let blank = Submit(String::new());

        assert!(!dispatcher.should_begin_dispatching(&named, &named, &Signup::Blank));
        assert!(dispatcher.should_cancel_current_action(
            &named,
            &blank,
            &Signup::Rejected("x".into())
        ));
        assert_eq!(
            dispatcher.action_will_begin_dispatching(&named, &Signup::Blank).await,
            Some(Signup::Sending("Ada".into()))
        );
        assert_eq!(
            dispatcher.dispatch(&blank, &Signup::Sending(String::new())).await,
            Signup::Rejected("empty name".into())
        );
        assert_eq!(
            dispatcher
                .action_did_end_dispatching(&blank, &Signup::Rejected("empty name".into()))
                .await,
            Some(Signup::Blank)
        );
        assert_eq!(
            dispatcher
                .action_did_end_dispatching(&named, &Signup::Sent("Ada".into()))
                .await,
            None
        );
    }

    #[tokio::test]
    async fn cloned_dispatcher_shares_handlers() {
        let dispatcher = DispatcherBuilder::new()
            .dispatch(|Submit(name): Submit, _: Signup| async move { Signup::Sent(name) })
            .build()
            .unwrap();
        let cloned = dispatcher.clone();

        let action = Submit("Lin".into());
        assert_eq!(
            cloned.dispatch(&action, &Signup::Blank).await,
            dispatcher.dispatch(&action, &Signup::Blank).await
        );
    }
}
