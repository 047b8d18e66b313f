//! Application Queue
//!
//! This example demonstrates a hand-written dispatcher.
//!
//! Key concepts:
//! - Submitting the same applicant twice while it is in flight is refused
//! - Different applicants wait for the one in flight to finish
//! - `history()` groups published states by dispatch
//!
//! Run with: cargo run --example application_queue

use action_machine::{state_enum, Action, ActionStateMachine, Dispatcher};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

state_enum! {
    enum Submission {
        Idle,
        Sending,
        Sent,
    }
    initial: Idle
    final: [Sent]
}

#[derive(Clone, Debug, PartialEq)]
struct Apply {
    applicant: String,
}

impl Action for Apply {
    fn name(&self) -> &str {
        &self.applicant
    }
}

struct ApplicationDesk;

#[async_trait]
impl Dispatcher for ApplicationDesk {
    type State = Submission;
    type Action = Apply;

    fn should_begin_dispatching(&self, current: &Apply, new: &Apply, _: &Submission) -> bool {
        current != new
    }

    async fn action_will_begin_dispatching(&self, _: &Apply, _: &Submission) -> Option<Submission> {
        Some(Submission::Sending)
    }

    async fn dispatch(&self, action: &Apply, _: &Submission) -> Submission {
        println!("  submitting {}", action.applicant);
        sleep(Duration::from_millis(50)).await;
        Submission::Sent
    }
}

fn apply(applicant: &str) -> Apply {
    Apply {
        applicant: applicant.to_string(),
    }
}

#[tokio::main]
async fn main() {
    println!("=== Application Queue Example ===\n");

    let machine = ActionStateMachine::new(ApplicationDesk);

    machine.accept(apply("Ada")).await;
    // Refused: Ada is already in flight.
    machine.accept(apply("Ada")).await;
    // Waits for Ada, then starts.
    machine.accept(apply("Grace")).await;
    sleep(Duration::from_millis(200)).await;

    let history = machine.history();
    for transition in history.transitions() {
        println!(
            "{} [{}] {:?} -> {:?}",
            transition.action, transition.stage, transition.from, transition.to
        );
    }
    println!("\nFinal state: {:?}", machine.current_state());
    println!("\n=== Example Complete ===");
}
