//! Action Machine: a single-writer, cancellable action-dispatch state machine
//!
//! An [`ActionStateMachine`] takes actions from any number of concurrent
//! callers and turns them into one ordered sequence of published states.
//! What to admit, what to preempt and what work to do is decided by a
//! pluggable [`Dispatcher`]; the machine only guarantees ordering,
//! exclusivity and cooperative cancellation.
//!
//! # Core Concepts
//!
//! - **State**: Immutable snapshot with a distinguished initial value
//! - **Action**: Immutable intent submitted through `accept`
//! - **Dispatcher**: Admission gate, preemption rule and the async lifecycle steps
//! - **State stream**: Replays the current state, then every distinct change
//!
//! # Example
//!
//! ```rust
//! use action_machine::{state_enum, Action, ActionStateMachine, DispatcherBuilder};
//!
//! state_enum! {
//!     enum Transfer {
//!         Idle,
//!         Sending,
//!         Sent,
//!     }
//!     initial: Idle
//!     final: [Sent]
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Pay(u64);
//!
//! impl Action for Pay {
//!     fn name(&self) -> &str {
//!         "Pay"
//!     }
//! }
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_all()
//!     .build()
//!     .unwrap();
//!
//! runtime.block_on(async {
//!     let dispatcher = DispatcherBuilder::new()
//!         // A second identical transfer is ignored while one is in flight.
//!         .admit_when(|current: &Pay, new: &Pay, _: &Transfer| current != new)
//!         .will_begin(|_: Pay, _: Transfer| async { Some(Transfer::Sending) })
//!         .dispatch(|_: Pay, _: Transfer| async { Transfer::Sent })
//!         .build()
//!         .unwrap();
//!
//!     let machine = ActionStateMachine::new(dispatcher);
//!     let mut states = machine.state_stream();
//!
//!     machine.accept(Pay(10)).await;
//!
//!     assert_eq!(states.next().await, Some(Transfer::Idle));
//!     assert_eq!(states.next().await, Some(Transfer::Sending));
//!     assert_eq!(states.next().await, Some(Transfer::Sent));
//! });
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, DispatcherBuilder, StateMachineBuilder};
pub use config::MachineConfig;
pub use core::{Action, Policy, Stage, State, StateHistory, StateTransition};
pub use dispatcher::{Dispatcher, FnDispatcher};
pub use machine::{ActionStateMachine, LifecycleEvent, StateStream};
