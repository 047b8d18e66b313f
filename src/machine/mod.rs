//! Action-dispatch state machine.
//!
//! [`ActionStateMachine`] accepts actions from any number of callers and
//! turns them into one ordered sequence of published states. For every
//! admitted action a task runs the lifecycle:
//!
//! 1. publish `action_will_begin_dispatching`, if any
//! 2. stop here if cancelled
//! 3. publish `dispatch`
//! 4. stop here if cancelled
//! 5. publish `action_did_end_dispatching`, if any, and clear the in-flight record
//!
//! Lifecycles never overlap. A preempting action is recorded and its task
//! spawned immediately, but the task first awaits the preempted task's
//! completion token, so its lifecycle begins only after the preempted one
//! has reached a checkpoint and exited. Dispatcher calls are never
//! interrupted, so a dispatch in progress when cancellation is requested
//! still has its result published.

mod events;
mod inflight;
mod stream;

pub use events::LifecycleEvent;
pub use stream::StateStream;

use crate::builder::{BuildError, StateMachineBuilder};
use crate::config::MachineConfig;
use crate::core::{Action, Stage, State, StateHistory};
use crate::dispatcher::Dispatcher;
use inflight::{admission, live, Admission, InFlight};
use parking_lot::Mutex;
use std::sync::Arc;
use stream::{Origin, StatePublisher};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Single-writer, cancellable, sequential action processor.
///
/// Share it between callers with an `Arc`; every method takes `&self`.
pub struct ActionStateMachine<D: Dispatcher> {
    inner: Arc<Inner<D>>,
}

struct Inner<D: Dispatcher> {
    id: Uuid,
    dispatcher: D,
    config: MachineConfig,
    publisher: StatePublisher<D::State>,
    in_flight: Mutex<Option<InFlight<D::Action>>>,
}

impl<D: Dispatcher> ActionStateMachine<D> {
    /// Create a machine in `State::initial()` with the default configuration.
    pub fn new(dispatcher: D) -> Self {
        Self::from_parts(dispatcher, MachineConfig::default())
    }

    /// Create a machine with an explicit configuration.
    pub fn with_config(dispatcher: D, config: MachineConfig) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self::from_parts(dispatcher, config))
    }

    /// Start building a machine around `dispatcher`.
    pub fn builder(dispatcher: D) -> StateMachineBuilder<D> {
        StateMachineBuilder::new(dispatcher)
    }

    pub(crate) fn from_parts(dispatcher: D, config: MachineConfig) -> Self {
        let publisher = StatePublisher::new(config.stream_capacity, config.history_limit);
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                dispatcher,
                config,
                publisher,
                in_flight: Mutex::new(None),
            }),
        }
    }

    /// Identifier attached to every log line of this machine.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &MachineConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> &D {
        &self.inner.dispatcher
    }

    /// The most recently published state.
    pub fn current_state(&self) -> D::State {
        self.inner.publisher.current()
    }

    /// Subscribe to published states, starting with the current one.
    pub fn state_stream(&self) -> StateStream<D::State> {
        self.inner.publisher.subscribe()
    }

    /// Recently published transitions, oldest first.
    pub fn history(&self) -> StateHistory<D::State> {
        self.inner.publisher.history()
    }

    /// The action that currently owns the machine, if its task is still running.
    pub fn current_action(&self) -> Option<D::Action> {
        self.inner
            .in_flight
            .lock()
            .as_ref()
            .filter(|record| !record.is_finished())
            .map(|record| record.action.clone())
    }

    pub fn is_dispatching(&self) -> bool {
        self.current_action().is_some()
    }

    /// Submit an action.
    ///
    /// Returns once the action has been started, refused, or has preempted
    /// the action in flight. When the dispatcher asks the new action to wait,
    /// this call waits for the in-flight task to exit and then decides again
    /// against whatever action is in flight at that point. It never waits for
    /// the submitted action's own lifecycle.
    ///
    /// Dispatcher policies run without any machine lock held, so they may
    /// call back into read-only accessors such as [`current_action`].
    ///
    /// [`current_action`]: Self::current_action
    pub async fn accept(&self, action: D::Action) {
        loop {
            let current = live(self.inner.in_flight.lock().as_ref());
            let state = self.inner.publisher.current();
            let decision = admission(&self.inner.dispatcher, current.as_ref(), &action, &state);

            let completion = {
                let mut in_flight = self.inner.in_flight.lock();
                let record = in_flight.as_ref().filter(|record| !record.is_finished());
                if record.map(|record| record.id) != current.as_ref().map(|current| current.id) {
                    // Another caller got in between; decide against the new record.
                    continue;
                }

                match decision {
                    Admission::Start => {
                        *in_flight = Some(self.start(action, None));
                        return;
                    }
                    Admission::Refuse => {
                        self.inner.trace(LifecycleEvent::Refused, action.name(), None);
                        return;
                    }
                    Admission::Preempt { victim } => {
                        let predecessor = record.map(|record| {
                            record.cancel();
                            record.completion()
                        });
                        self.inner
                            .trace(LifecycleEvent::Cancelled, action.name(), Some(victim));
                        *in_flight = Some(self.start(action, predecessor));
                        return;
                    }
                    Admission::Wait { victim, completion } => {
                        self.inner
                            .trace(LifecycleEvent::Waiting, action.name(), Some(victim));
                        completion
                    }
                }
            };
            completion.cancelled().await;
        }
    }

    /// Spawn the lifecycle task for `action`. Called with the in-flight lock held.
    ///
    /// A preempting action passes the preempted task's completion token; its
    /// lifecycle begins only once that task has exited, so lifecycles run in
    /// admission order whatever the scheduler does.
    fn start(
        &self,
        action: D::Action,
        predecessor: Option<CancellationToken>,
    ) -> InFlight<D::Action> {
        let record = InFlight::new(action.clone());
        let dispatch_id = record.id;
        let cancel = record.cancellation();
        let completion = record.completion();
        let inner = Arc::clone(&self.inner);

        inner.trace(LifecycleEvent::Admitted, action.name(), Some(dispatch_id));
        tokio::spawn(async move {
            let _completion = completion.drop_guard();
            if let Some(predecessor) = predecessor {
                predecessor.cancelled().await;
            }
            inner.perform(dispatch_id, &action, &cancel).await;
            inner.finish(dispatch_id);
        });

        record
    }
}

impl<D: Dispatcher> Drop for ActionStateMachine<D> {
    fn drop(&mut self) {
        if let Some(record) = self.inner.in_flight.lock().as_ref() {
            record.cancel();
        }
    }
}

impl<D: Dispatcher> Inner<D> {
    async fn perform(&self, dispatch_id: Uuid, action: &D::Action, cancel: &CancellationToken) {
        self.trace(LifecycleEvent::WillBegin, action.name(), Some(dispatch_id));
        let state = self.publisher.current();
        if let Some(next) = self
            .dispatcher
            .action_will_begin_dispatching(action, &state)
            .await
        {
            self.publish(next, Stage::WillBegin, action, dispatch_id);
        }

        if cancel.is_cancelled() {
            self.trace(LifecycleEvent::Stopped, action.name(), Some(dispatch_id));
            return;
        }

        self.trace(LifecycleEvent::Dispatching, action.name(), Some(dispatch_id));
        let state = self.publisher.current();
        let next = self.dispatcher.dispatch(action, &state).await;
        self.publish(next, Stage::Dispatch, action, dispatch_id);

        if cancel.is_cancelled() {
            self.trace(LifecycleEvent::Stopped, action.name(), Some(dispatch_id));
            return;
        }

        let state = self.publisher.current();
        if let Some(next) = self
            .dispatcher
            .action_did_end_dispatching(action, &state)
            .await
        {
            self.publish(next, Stage::DidEnd, action, dispatch_id);
        }

        self.trace(LifecycleEvent::Ended, action.name(), Some(dispatch_id));
    }

    /// Clear the in-flight record if it still belongs to `dispatch_id`.
    /// A preempted task must leave its successor's record alone.
    fn finish(&self, dispatch_id: Uuid) {
        let mut in_flight = self.in_flight.lock();
        if in_flight
            .as_ref()
            .is_some_and(|record| record.id == dispatch_id)
        {
            *in_flight = None;
        }
    }

    fn publish(&self, state: D::State, stage: Stage, action: &D::Action, dispatch_id: Uuid) {
        let name = state.name().to_string();
        let published = self.publisher.publish(
            state,
            Origin {
                stage,
                action: action.name(),
                dispatch_id,
            },
        );
        if published && self.config.verbose {
            tracing::debug!(
                machine = %self.id,
                dispatch = %dispatch_id,
                %stage,
                state = %name,
                "published state"
            );
        }
    }

    fn trace(&self, event: LifecycleEvent, action: &str, dispatch_id: Option<Uuid>) {
        if !self.config.verbose {
            return;
        }
        match dispatch_id {
            Some(dispatch) => {
                tracing::info!(machine = %self.id, %dispatch, action, "{event}")
            }
            None => tracing::info!(machine = %self.id, action, "{event}"),
        }
    }
}
