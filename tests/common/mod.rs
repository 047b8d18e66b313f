//! Shared fixtures: a recruitment workflow whose network calls are simulated
//! with sleeps, so tests run on a paused tokio clock.

#![allow(dead_code)]

use action_machine::{Action, ActionStateMachine, Dispatcher, MachineConfig, State, StateStream};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub const FAKE_NETWORK_DELAY: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SendingStatus {
    Initial,
    Sending,
    Completed,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RecruitmentState {
    pub applicant_name: String,
    pub sending_status: SendingStatus,
}

impl RecruitmentState {
    pub fn new(applicant_name: &str, sending_status: SendingStatus) -> Self {
        Self {
            applicant_name: applicant_name.to_string(),
            sending_status,
        }
    }

    pub fn sending(applicant_name: &str) -> Self {
        Self::new(applicant_name, SendingStatus::Sending)
    }

    pub fn completed(applicant_name: &str) -> Self {
        Self::new(applicant_name, SendingStatus::Completed)
    }
}

impl State for RecruitmentState {
    fn initial() -> Self {
        Self::new("", SendingStatus::Initial)
    }

    fn name(&self) -> &str {
        match self.sending_status {
            SendingStatus::Initial => "Initial",
            SendingStatus::Sending => "Sending",
            SendingStatus::Completed => "Completed",
        }
    }

    fn is_final(&self) -> bool {
        self.sending_status == SendingStatus::Completed
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RecruitmentAction {
    SubmitApplication { applicant_name: String },
}

impl RecruitmentAction {
    pub fn submit(applicant_name: &str) -> Self {
        Self::SubmitApplication {
            applicant_name: applicant_name.to_string(),
        }
    }

    pub fn applicant_name(&self) -> &str {
        match self {
            Self::SubmitApplication { applicant_name } => applicant_name,
        }
    }
}

impl Action for RecruitmentAction {
    fn name(&self) -> &str {
        match self {
            Self::SubmitApplication { .. } => "SubmitApplication",
        }
    }
}

/// Simulated backend.
pub struct MockApiClient {
    delay: Duration,
}

impl MockApiClient {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn prepare(&self, _applicant_name: &str) {
        sleep(self.delay).await;
    }

    pub async fn submit(&self, _applicant_name: &str) {
        sleep(self.delay).await;
    }
}

/// Test double with switchable policies and a probe counting concurrent
/// `dispatch` calls.
pub struct RecruitmentDispatcher {
    api_client: MockApiClient,
    pub new_action_should_cancel_previous_action: AtomicBool,
    pub refuse_duplicate_applicants: AtomicBool,
    active_dispatches: AtomicUsize,
    max_active_dispatches: AtomicUsize,
    dispatch_calls: AtomicUsize,
}

impl RecruitmentDispatcher {
    pub fn new(api_client: MockApiClient) -> Self {
        Self {
            api_client,
            new_action_should_cancel_previous_action: AtomicBool::new(false),
            refuse_duplicate_applicants: AtomicBool::new(false),
            active_dispatches: AtomicUsize::new(0),
            max_active_dispatches: AtomicUsize::new(0),
            dispatch_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_cancel_previous(&self, cancel: bool) {
        self.new_action_should_cancel_previous_action
            .store(cancel, Ordering::SeqCst);
    }

    pub fn set_refuse_duplicates(&self, refuse: bool) {
        self.refuse_duplicate_applicants.store(refuse, Ordering::SeqCst);
    }

    pub fn max_active_dispatches(&self) -> usize {
        self.max_active_dispatches.load(Ordering::SeqCst)
    }

    pub fn dispatch_calls(&self) -> usize {
        self.dispatch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Dispatcher for RecruitmentDispatcher {
    type State = RecruitmentState;
    type Action = RecruitmentAction;

    fn should_begin_dispatching(
        &self,
        current: &RecruitmentAction,
        new: &RecruitmentAction,
        _state: &RecruitmentState,
    ) -> bool {
        !(self.refuse_duplicate_applicants.load(Ordering::SeqCst) && current == new)
    }

    fn should_cancel_current_action(
        &self,
        _current: &RecruitmentAction,
        _new: &RecruitmentAction,
        _state: &RecruitmentState,
    ) -> bool {
        self.new_action_should_cancel_previous_action
            .load(Ordering::SeqCst)
    }

    async fn action_will_begin_dispatching(
        &self,
        action: &RecruitmentAction,
        _state: &RecruitmentState,
    ) -> Option<RecruitmentState> {
        self.api_client.prepare(action.applicant_name()).await;
        Some(RecruitmentState::sending(action.applicant_name()))
    }

    async fn dispatch(
        &self,
        action: &RecruitmentAction,
        _state: &RecruitmentState,
    ) -> RecruitmentState {
        self.dispatch_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active_dispatches.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_dispatches.fetch_max(active, Ordering::SeqCst);

        self.api_client.submit(action.applicant_name()).await;

        self.active_dispatches.fetch_sub(1, Ordering::SeqCst);
        RecruitmentState::completed(action.applicant_name())
    }
}

pub type RecruitmentMachine = ActionStateMachine<Arc<RecruitmentDispatcher>>;

/// Verbose machine sharing its dispatcher with the test.
pub fn recruitment_machine() -> (Arc<RecruitmentMachine>, Arc<RecruitmentDispatcher>) {
    recruitment_machine_with_delay(FAKE_NETWORK_DELAY)
}

/// Same as [`recruitment_machine`] with a custom simulated network delay,
/// for tests on a real clock.
pub fn recruitment_machine_with_delay(
    delay: Duration,
) -> (Arc<RecruitmentMachine>, Arc<RecruitmentDispatcher>) {
    init_tracing();
    let dispatcher = Arc::new(RecruitmentDispatcher::new(MockApiClient::new(delay)));
    let machine = ActionStateMachine::with_config(
        Arc::clone(&dispatcher),
        MachineConfig::default().with_verbose(true),
    )
    .expect("default config is valid");
    (Arc::new(machine), dispatcher)
}

/// Every state recorded in the machine's history, oldest first.
pub fn published(machine: &RecruitmentMachine) -> Vec<RecruitmentState> {
    machine
        .history()
        .transitions()
        .iter()
        .map(|t| t.to.clone())
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Collect states until `target` is yielded (inclusive), failing after five
/// seconds of (virtual) time.
pub async fn collect_until<S: State>(stream: &mut StateStream<S>, target: &S) -> Vec<S> {
    let collect = async {
        let mut states = Vec::new();
        while let Some(state) = stream.next().await {
            let reached = state == *target;
            states.push(state);
            if reached {
                break;
            }
        }
        states
    };

    timeout(Duration::from_secs(5), collect)
        .await
        .expect("target state was not published in time")
}

/// The last `n` elements of `states`.
pub fn tail<S: Clone>(states: &[S], n: usize) -> Vec<S> {
    assert!(states.len() >= n, "expected at least {n} states, got {}", states.len());
    states[states.len() - n..].to_vec()
}
