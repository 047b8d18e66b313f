//! Search As You Type
//!
//! This example demonstrates "latest wins" preemption.
//!
//! Key concepts:
//! - Every keystroke submits a new query
//! - A new query cancels the one in flight at its next checkpoint
//! - Subscribers only ever see states in lifecycle order
//!
//! Run with: cargo run --example search_as_you_type

use action_machine::builder::DispatcherBuilder;
use action_machine::core::{Action, Policy};
use action_machine::{ActionStateMachine, MachineConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
enum SearchState {
    Empty,
    Searching(String),
    Results { query: String, hits: usize },
}

impl action_machine::State for SearchState {
    fn initial() -> Self {
        Self::Empty
    }

    fn name(&self) -> &str {
        match self {
            Self::Empty => "Empty",
            Self::Searching(_) => "Searching",
            Self::Results { .. } => "Results",
        }
    }
}

#[derive(Clone, Debug)]
struct Query(String);

impl Action for Query {
    fn name(&self) -> &str {
        "Query"
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();
    println!("=== Search As You Type Example ===\n");

    let dispatcher = DispatcherBuilder::new()
        .cancel(Policy::always())
        .will_begin(|Query(text): Query, _: SearchState| async move {
            Some(SearchState::Searching(text))
        })
        .dispatch(|Query(text): Query, _: SearchState| async move {
            // Pretend the backend takes a while.
            sleep(Duration::from_millis(80)).await;
            let hits = text.len() * 3;
            SearchState::Results { query: text, hits }
        })
        .build()
        .unwrap();

    let machine = Arc::new(
        ActionStateMachine::with_config(dispatcher, MachineConfig::default().with_verbose(true))
            .unwrap(),
    );

    let mut states = machine.state_stream();
    let printer = tokio::spawn(async move {
        while let Some(state) = states.next().await {
            println!("  state: {state:?}");
            if matches!(&state, SearchState::Results { query, .. } if query == "rust") {
                break;
            }
        }
    });

    for prefix in ["r", "ru", "rus", "rust"] {
        println!("typed {prefix:?}");
        machine.accept(Query(prefix.to_string())).await;
        sleep(Duration::from_millis(30)).await;
    }

    printer.await.unwrap();
    println!("\nFinal state: {:?}", machine.current_state());
    println!("\n=== Example Complete ===");
}
