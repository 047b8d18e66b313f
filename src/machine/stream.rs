//! State publication and subscription.
//!
//! The publisher owns the current state and a broadcast sender. Publishing
//! and subscribing both happen under the same lock, so a subscriber's first
//! element (the current state) and the broadcast it then listens to never
//! overlap or leave a gap.

use crate::core::{Stage, State, StateHistory, StateTransition};
use chrono::Utc;
use futures_util::stream::{self, Stream};
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

/// Where a published state came from.
pub(crate) struct Origin<'a> {
    pub stage: Stage,
    pub action: &'a str,
    pub dispatch_id: Uuid,
}

struct Published<S: State> {
    current: S,
    history: Option<StateHistory<S>>,
}

pub(crate) struct StatePublisher<S: State> {
    published: Mutex<Published<S>>,
    tx: broadcast::Sender<S>,
}

impl<S: State> StatePublisher<S> {
    pub fn new(capacity: usize, history_limit: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        let history = (history_limit > 0).then(|| StateHistory::with_limit(history_limit));
        Self {
            published: Mutex::new(Published {
                current: S::initial(),
                history,
            }),
            tx,
        }
    }

    pub fn current(&self) -> S {
        self.published.lock().current.clone()
    }

    pub fn history(&self) -> StateHistory<S> {
        self.published
            .lock()
            .history
            .clone()
            .unwrap_or_else(|| StateHistory::with_limit(0))
    }

    /// Publish `state` unless it equals the current one. Returns whether a
    /// new state was published.
    pub fn publish(&self, state: S, origin: Origin<'_>) -> bool {
        let mut published = self.published.lock();
        if published.current == state {
            return false;
        }

        if let Some(history) = published.history.as_ref() {
            let recorded = history.record(StateTransition {
                from: published.current.clone(),
                to: state.clone(),
                timestamp: Utc::now(),
                stage: origin.stage,
                action: origin.action.to_string(),
                dispatch_id: origin.dispatch_id,
            });
            published.history = Some(recorded);
        }

        published.current = state.clone();
        // No subscribers is not an error; the current state is still kept.
        let _ = self.tx.send(state);
        true
    }

    pub fn subscribe(&self) -> StateStream<S> {
        let published = self.published.lock();
        StateStream {
            pending: Some(published.current.clone()),
            last: None,
            rx: self.tx.subscribe(),
        }
    }
}

/// A subscription to a machine's published states.
///
/// The first element is the state that was current at subscription time,
/// followed by every later change. Adjacent equal states are never yielded.
/// The stream ends once the machine and all of its running lifecycles are
/// gone.
pub struct StateStream<S: State> {
    pending: Option<S>,
    last: Option<S>,
    rx: broadcast::Receiver<S>,
}

impl<S: State> StateStream<S> {
    /// Wait for the next distinct state.
    pub async fn next(&mut self) -> Option<S> {
        if let Some(state) = self.pending.take() {
            self.last = Some(state.clone());
            return Some(state);
        }

        loop {
            match self.rx.recv().await {
                Ok(state) => {
                    if self.last.as_ref() == Some(&state) {
                        continue;
                    }
                    self.last = Some(state.clone());
                    return Some(state);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "state stream lagged; intermediate states were dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a [`Stream`] for use with stream combinators.
    pub fn into_stream(self) -> impl Stream<Item = S> + Send + Unpin {
        Box::pin(stream::unfold(self, |mut subscription| async move {
            let state = subscription.next().await?;
            Some((state, subscription))
        }))
    }
}
